// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store with the same semantics as [`SqliteStore`](crate::SqliteStore).
//!
//! All state is lost on drop. Used by tests and by `consulta serve --ephemeral`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use consulta_core::{
    Adapter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, AppointmentStore,
    ConsultaError, ConsultantDirectory, ConsultantProfile, HealthStatus, UserId,
};

/// Appointments and consultants held in `HashMap`s behind `RwLock`s.
pub struct MemoryStore {
    appointments: RwLock<HashMap<AppointmentId, Appointment>>,
    consultants: RwLock<HashMap<UserId, ConsultantProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
            consultants: RwLock::new(HashMap::new()),
        }
    }

    pub async fn upsert_consultant(&self, profile: &ConsultantProfile) -> Result<(), ConsultaError> {
        let mut consultants = self.consultants.write().await;
        consultants.insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ConsultaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConsultaError> {
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), ConsultaError> {
        let mut appointments = self.appointments.write().await;
        if appointments.contains_key(&appointment.id) {
            return Err(ConsultaError::Validation(format!(
                "appointment {} already exists",
                appointment.id
            )));
        }
        appointments.insert(appointment.id.clone(), appointment.clone());
        Ok(())
    }

    async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, ConsultaError> {
        let appointments = self.appointments.read().await;
        Ok(appointments.get(id).cloned())
    }

    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ConsultaError> {
        let appointments = self.appointments.read().await;
        let mut matched: Vec<Appointment> = appointments
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matched)
    }

    async fn compare_and_swap(
        &self,
        expected: AppointmentStatus,
        updated: &Appointment,
    ) -> Result<(), ConsultaError> {
        let mut appointments = self.appointments.write().await;
        let current = appointments
            .get_mut(&updated.id)
            .ok_or_else(|| ConsultaError::appointment_not_found(&updated.id))?;
        if current.status != expected {
            return Err(ConsultaError::ConcurrentModification {
                id: updated.id.to_string(),
                expected,
            });
        }
        *current = updated.clone();
        Ok(())
    }
}

#[async_trait]
impl ConsultantDirectory for MemoryStore {
    async fn get_consultant(&self, id: &UserId) -> Result<Option<ConsultantProfile>, ConsultaError> {
        let consultants = self.consultants.read().await;
        Ok(consultants.get(id).cloned())
    }

    async fn list_consultants(&self) -> Result<Vec<ConsultantProfile>, ConsultaError> {
        let consultants = self.consultants.read().await;
        let mut all: Vec<_> = consultants.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use consulta_core::{CompanyId, Urgency};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn make_appointment(id: &str, offset_minutes: i64) -> Appointment {
        let base = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        Appointment {
            id: AppointmentId::parse(id).unwrap(),
            title: "Bilan".into(),
            description: String::new(),
            scheduled_at: base + Duration::minutes(offset_minutes),
            duration: 30,
            status: AppointmentStatus::Pending,
            urgency: Urgency::Normal,
            requester: UserId::parse("emp-1").unwrap(),
            consultant: None,
            company: Some(CompanyId::parse("acme").unwrap()),
            meeting_url: None,
            notes: None,
            completed_at: None,
            created_at: base,
            updated_at: base,
        }
    }

    #[tokio::test]
    async fn insert_get_and_duplicate() {
        let store = MemoryStore::new();
        let appt = make_appointment("A1", 0);
        store.insert(&appt).await.unwrap();
        assert_eq!(store.get(&appt.id).await.unwrap(), Some(appt.clone()));
        assert!(matches!(
            store.insert(&appt).await,
            Err(ConsultaError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn compare_and_swap_checks_status() {
        let store = MemoryStore::new();
        let appt = make_appointment("A1", 0);
        store.insert(&appt).await.unwrap();

        let mut assigned = appt.clone();
        assigned.status = AppointmentStatus::Assigned;
        assigned.consultant = Some(UserId::parse("consultant-7").unwrap());
        store
            .compare_and_swap(AppointmentStatus::Pending, &assigned)
            .await
            .unwrap();

        let err = store
            .compare_and_swap(AppointmentStatus::Pending, &assigned)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsultaError::ConcurrentModification { .. }));

        let ghost = make_appointment("ghost", 0);
        let err = store
            .compare_and_swap(AppointmentStatus::Pending, &ghost)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsultaError::NotFound { .. }));
    }

    #[tokio::test]
    async fn racing_swaps_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let appt = make_appointment("A1", 0);
        store.insert(&appt).await.unwrap();

        let mut handles = Vec::new();
        for target in [AppointmentStatus::Canceled, AppointmentStatus::Rejected] {
            let store = Arc::clone(&store);
            let mut next = appt.clone();
            next.status = target;
            handles.push(tokio::spawn(async move {
                store.compare_and_swap(AppointmentStatus::Pending, &next).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    proptest! {
        #[test]
        fn list_is_sorted_by_schedule_then_id(offsets in proptest::collection::vec(0i64..50, 1..20)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = MemoryStore::new();
                for (i, offset) in offsets.iter().enumerate() {
                    store.insert(&make_appointment(&format!("A{i:02}"), *offset)).await.unwrap();
                }
                let listed = store.list(&AppointmentFilter::default()).await.unwrap();
                assert_eq!(listed.len(), offsets.len());
                for pair in listed.windows(2) {
                    let key = |a: &Appointment| (a.scheduled_at, a.id.clone());
                    assert!(key(&pair[0]) <= key(&pair[1]));
                }
            });
        }
    }
}
