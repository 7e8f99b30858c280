// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle service: read, plan, conditional write, notify.

use std::sync::Arc;

use tracing::{debug, info, warn};

use consulta_config::AvailabilityPolicy;
use consulta_core::{
    Actor, Appointment, AppointmentId, AppointmentStatus, AppointmentStore, Clock, ConsultaError,
    ConsultantDirectory, ConsultantProfile, EventKind, HealthStatus, LifecycleEvent,
    MeetingProvisioner, NewAppointment, NotificationSink, SystemClock, UserId,
};

use crate::matcher::rank_candidates;
use crate::meeting::UrlTemplateProvisioner;
use crate::query::{ListQuery, ListScope, can_view, matches_search};
use crate::stats::AppointmentStats;
use crate::transition::{Action, plan};

/// Entry point for every appointment operation.
///
/// Each transition is one read followed by one conditional write keyed on the
/// status that was read. If another writer got there first the store reports
/// `ConcurrentModification` and nothing is written.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn AppointmentStore>,
    directory: Arc<dyn ConsultantDirectory>,
    sink: Arc<dyn NotificationSink>,
    provisioner: Arc<dyn MeetingProvisioner>,
    clock: Arc<dyn Clock>,
    policy: AvailabilityPolicy,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        directory: Arc<dyn ConsultantDirectory>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            directory,
            sink,
            provisioner: Arc::new(UrlTemplateProvisioner::disabled()),
            clock: Arc::new(SystemClock),
            policy: AvailabilityPolicy::default(),
        }
    }

    pub fn with_provisioner(mut self, provisioner: Arc<dyn MeetingProvisioner>) -> Self {
        self.provisioner = provisioner;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: AvailabilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        self.policy
    }

    /// Health of the backing store.
    pub async fn health(&self) -> Result<HealthStatus, ConsultaError> {
        self.store.health_check().await
    }

    /// Create a new `PENDING` request owned by `actor`.
    pub async fn request(
        &self,
        actor: &Actor,
        new: NewAppointment,
    ) -> Result<Appointment, ConsultaError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(ConsultaError::Validation("title must not be blank".into()));
        }
        if new.duration == 0 {
            return Err(ConsultaError::Validation(
                "duration must be a positive number of minutes".into(),
            ));
        }

        let now = self.clock.now();
        let appointment = Appointment {
            id: AppointmentId::generate(),
            title: title.to_string(),
            description: new.description.trim().to_string(),
            scheduled_at: consulta_core::types::truncate_timestamp(new.scheduled_at),
            duration: new.duration,
            status: AppointmentStatus::Pending,
            urgency: new.urgency.unwrap_or_default(),
            requester: actor.id.clone(),
            consultant: None,
            company: actor.company.clone(),
            meeting_url: None,
            notes: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&appointment).await?;
        info!(
            appointment_id = %appointment.id,
            requester = %actor.id,
            scheduled_at = %appointment.scheduled_at,
            "appointment requested"
        );
        self.notify(EventKind::AppointmentRequested, &appointment, actor)
            .await;
        Ok(appointment)
    }

    /// Fetch one appointment.
    pub async fn get(&self, id: &str) -> Result<Appointment, ConsultaError> {
        let id = AppointmentId::parse(id)?;
        self.load(&id).await
    }

    /// Fetch one appointment on behalf of `actor`.
    ///
    /// Fails with `Forbidden` unless the actor requested it, is assigned to
    /// it, or administers its company.
    pub async fn view(&self, actor: &Actor, id: &str) -> Result<Appointment, ConsultaError> {
        let appointment = self.get(id).await?;
        if !can_view(actor, &appointment) {
            return Err(ConsultaError::Forbidden {
                action: "view",
                role: actor.role,
            });
        }
        Ok(appointment)
    }

    /// List appointments visible to `actor` under `query.scope`.
    pub async fn list(
        &self,
        actor: &Actor,
        query: &ListQuery,
    ) -> Result<Vec<Appointment>, ConsultaError> {
        let filter = query.filter_for(actor)?;
        let mut appointments = self.store.list(&filter).await?;
        if let Some(needle) = query.search.as_deref() {
            appointments.retain(|a| matches_search(a, needle));
        }
        debug!(
            actor = %actor.id,
            scope = %query.scope,
            count = appointments.len(),
            "appointments listed"
        );
        Ok(appointments)
    }

    /// Summary figures over the appointments in `scope`.
    pub async fn stats(
        &self,
        actor: &Actor,
        scope: ListScope,
    ) -> Result<AppointmentStats, ConsultaError> {
        let appointments = self.list(actor, &ListQuery::new(scope)).await?;
        Ok(AppointmentStats::summarize(&appointments))
    }

    /// Ranked consultants for an appointment, optionally filtered by text.
    pub async fn candidates(
        &self,
        appointment_id: &str,
        query: Option<&str>,
    ) -> Result<Vec<ConsultantProfile>, ConsultaError> {
        self.get(appointment_id).await?;
        let consultants = self.directory.list_consultants().await?;
        Ok(rank_candidates(consultants, query))
    }

    /// [`Self::candidates`] for an appointment the actor may read.
    pub async fn candidates_for(
        &self,
        actor: &Actor,
        appointment_id: &str,
        query: Option<&str>,
    ) -> Result<Vec<ConsultantProfile>, ConsultaError> {
        self.view(actor, appointment_id).await?;
        let consultants = self.directory.list_consultants().await?;
        Ok(rank_candidates(consultants, query))
    }

    pub async fn assign_consultant(
        &self,
        actor: &Actor,
        appointment_id: &str,
        consultant_id: &str,
        notes: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        let consultant = UserId::parse(consultant_id)?;
        self.apply(actor, appointment_id, Action::Assign { consultant, notes })
            .await
    }

    pub async fn accept(
        &self,
        actor: &Actor,
        appointment_id: &str,
        meeting_url: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        self.apply(actor, appointment_id, Action::Accept { meeting_url })
            .await
    }

    pub async fn refuse(
        &self,
        actor: &Actor,
        appointment_id: &str,
        reason: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        self.apply(actor, appointment_id, Action::Refuse { reason })
            .await
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        appointment_id: &str,
        reason: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        self.apply(actor, appointment_id, Action::Reject { reason })
            .await
    }

    pub async fn cancel(
        &self,
        actor: &Actor,
        appointment_id: &str,
        reason: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        self.apply(actor, appointment_id, Action::Cancel { reason })
            .await
    }

    pub async fn complete(
        &self,
        actor: &Actor,
        appointment_id: &str,
        actual_duration: u32,
        notes: Option<String>,
    ) -> Result<Appointment, ConsultaError> {
        self.apply(
            actor,
            appointment_id,
            Action::Complete {
                actual_duration,
                notes,
            },
        )
        .await
    }

    /// Apply any transition. The typed wrappers above all land here.
    pub async fn apply(
        &self,
        actor: &Actor,
        appointment_id: &str,
        action: Action,
    ) -> Result<Appointment, ConsultaError> {
        let id = AppointmentId::parse(appointment_id)?;
        let current = self.load(&id).await?;
        let now = self.clock.now();

        let mut next = plan(&current, &action, actor, now)?;

        match &action {
            Action::Assign { consultant, .. } => {
                self.check_consultant(consultant, &id).await?;
            }
            Action::Accept { meeting_url: None } => {
                next.meeting_url = self.provision(&next).await;
            }
            _ => {}
        }

        self.store.compare_and_swap(current.status, &next).await?;

        info!(
            appointment_id = %id,
            action = action.name(),
            actor = %actor.id,
            from = %current.status,
            to = %next.status,
            "appointment transitioned"
        );
        self.notify(action.kind().event_kind(), &next, actor).await;
        Ok(next)
    }

    async fn load(&self, id: &AppointmentId) -> Result<Appointment, ConsultaError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ConsultaError::appointment_not_found(id))
    }

    async fn check_consultant(
        &self,
        consultant: &UserId,
        appointment_id: &AppointmentId,
    ) -> Result<(), ConsultaError> {
        let profile = self
            .directory
            .get_consultant(consultant)
            .await?
            .ok_or_else(|| ConsultaError::consultant_not_found(consultant))?;

        if !profile.is_available {
            match self.policy {
                AvailabilityPolicy::Advisory => warn!(
                    appointment_id = %appointment_id,
                    consultant = %consultant,
                    "assigning a consultant marked unavailable"
                ),
                AvailabilityPolicy::Strict => {
                    return Err(ConsultaError::Validation(format!(
                        "consultant {consultant} is not available"
                    )));
                }
            }
        }
        Ok(())
    }

    async fn provision(&self, appointment: &Appointment) -> Option<String> {
        match self.provisioner.provision(appointment).await {
            Ok(url) => url,
            Err(e) => {
                warn!(
                    appointment_id = %appointment.id,
                    error = %e,
                    "meeting provisioning failed, confirming without a link"
                );
                None
            }
        }
    }

    async fn notify(&self, kind: EventKind, appointment: &Appointment, actor: &Actor) {
        let event = LifecycleEvent {
            kind,
            appointment_id: appointment.id.clone(),
            actor_id: actor.id.clone(),
            consultant_id: appointment.consultant.clone(),
            timestamp: appointment.updated_at,
        };
        if let Err(e) = self.sink.emit(&event).await {
            warn!(
                appointment_id = %appointment.id,
                kind = %kind,
                error = %e,
                "notification failed, transition kept"
            );
        }
    }
}
