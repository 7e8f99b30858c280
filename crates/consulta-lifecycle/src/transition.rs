// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The appointment status state machine.
//!
//! ```text
//! PENDING   --assign-->   ASSIGNED    (admin)
//! PENDING   --reject-->   REJECTED    (admin)
//! ASSIGNED  --reject-->   REJECTED    (admin)
//! ASSIGNED  --accept-->   CONFIRMED   (assigned consultant or admin)
//! ASSIGNED  --refuse-->   REJECTED    (assigned consultant)
//! CONFIRMED --complete--> COMPLETED   (assigned consultant or admin)
//! non-terminal --cancel--> CANCELED   (admin or requester)
//! ```
//!
//! Checks run in a fixed order: status legality, then actor permission, then
//! argument validation. The first failure wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use consulta_core::{Actor, Appointment, AppointmentStatus, ConsultaError, EventKind, UserId};

/// Note recorded when an admin rejects without a reason.
pub const DEFAULT_REJECT_NOTE: &str = "Demande rejetée par l'administrateur";

/// Note recorded when the consultant refuses without a reason.
pub const DEFAULT_REFUSE_NOTE: &str = "Demande refusée par le consultant";

/// The name of a transition, without its arguments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Assign,
    Accept,
    Refuse,
    Reject,
    Cancel,
    Complete,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Accept => "accept",
            Self::Refuse => "refuse",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
        }
    }

    /// Whether this action is legal from `status`, ignoring who asks.
    pub fn allowed_from(self, status: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        match self {
            Self::Assign => status == Pending,
            Self::Reject => matches!(status, Pending | Assigned),
            Self::Accept | Self::Refuse => status == Assigned,
            Self::Complete => status == Confirmed,
            Self::Cancel => !status.is_terminal(),
        }
    }

    /// Every action legal from `status`, in declaration order.
    pub fn available_from(status: AppointmentStatus) -> Vec<ActionKind> {
        Self::iter().filter(|kind| kind.allowed_from(status)).collect()
    }

    /// Status an appointment has after this action succeeds.
    pub fn target(self) -> AppointmentStatus {
        match self {
            Self::Assign => AppointmentStatus::Assigned,
            Self::Accept => AppointmentStatus::Confirmed,
            Self::Refuse | Self::Reject => AppointmentStatus::Rejected,
            Self::Cancel => AppointmentStatus::Canceled,
            Self::Complete => AppointmentStatus::Completed,
        }
    }

    /// Event emitted after this action succeeds.
    pub fn event_kind(self) -> EventKind {
        match self {
            Self::Assign => EventKind::ConsultantAssigned,
            Self::Accept => EventKind::AppointmentConfirmed,
            Self::Refuse => EventKind::AppointmentRefused,
            Self::Reject => EventKind::AppointmentRejected,
            Self::Cancel => EventKind::AppointmentCanceled,
            Self::Complete => EventKind::AppointmentCompleted,
        }
    }
}

/// A requested transition with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Assign {
        consultant: UserId,
        notes: Option<String>,
    },
    Accept {
        meeting_url: Option<String>,
    },
    Refuse {
        reason: Option<String>,
    },
    Reject {
        reason: Option<String>,
    },
    Cancel {
        reason: Option<String>,
    },
    Complete {
        actual_duration: u32,
        notes: Option<String>,
    },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Assign { .. } => ActionKind::Assign,
            Self::Accept { .. } => ActionKind::Accept,
            Self::Refuse { .. } => ActionKind::Refuse,
            Self::Reject { .. } => ActionKind::Reject,
            Self::Cancel { .. } => ActionKind::Cancel,
            Self::Complete { .. } => ActionKind::Complete,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

fn is_assigned_consultant(current: &Appointment, actor: &Actor) -> bool {
    current.consultant.as_ref() == Some(&actor.id)
}

fn permitted(kind: ActionKind, current: &Appointment, actor: &Actor) -> bool {
    let admin = actor.role.is_admin();
    match kind {
        ActionKind::Assign | ActionKind::Reject => admin,
        ActionKind::Accept | ActionKind::Complete => {
            admin || is_assigned_consultant(current, actor)
        }
        ActionKind::Refuse => is_assigned_consultant(current, actor),
        ActionKind::Cancel => admin || current.requester == actor.id,
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Compute the record that results from applying `action` to `current`.
///
/// Pure: nothing is read or written. On success the returned record has the
/// target status and `updated_at = now`; `current` is never modified.
pub fn plan(
    current: &Appointment,
    action: &Action,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Appointment, ConsultaError> {
    let kind = action.kind();

    if !kind.allowed_from(current.status) {
        return Err(ConsultaError::InvalidState {
            action: kind.as_str(),
            status: current.status,
        });
    }

    if !permitted(kind, current, actor) {
        return Err(ConsultaError::Forbidden {
            action: kind.as_str(),
            role: actor.role,
        });
    }

    let mut next = current.clone();
    match action {
        Action::Assign { consultant, notes } => {
            next.consultant = Some(consultant.clone());
            if let Some(note) = non_blank(notes.as_deref()) {
                next.append_note(note);
            }
        }
        Action::Accept { meeting_url } => {
            if let Some(url) = meeting_url {
                if url.trim().is_empty() {
                    return Err(ConsultaError::Validation(
                        "meeting_url must not be blank".into(),
                    ));
                }
                next.meeting_url = Some(url.trim().to_string());
            }
        }
        Action::Refuse { reason } => {
            next.append_note(non_blank(reason.as_deref()).unwrap_or(DEFAULT_REFUSE_NOTE));
        }
        Action::Reject { reason } => {
            next.append_note(non_blank(reason.as_deref()).unwrap_or(DEFAULT_REJECT_NOTE));
        }
        Action::Cancel { reason } => {
            if let Some(reason) = non_blank(reason.as_deref()) {
                next.append_note(reason);
            }
        }
        Action::Complete {
            actual_duration,
            notes,
        } => {
            if *actual_duration == 0 {
                return Err(ConsultaError::Validation(
                    "actual duration must be a positive number of minutes".into(),
                ));
            }
            next.duration = *actual_duration;
            next.completed_at = Some(now);
            if let Some(note) = non_blank(notes.as_deref()) {
                next.append_note(note);
            }
        }
    }

    next.status = kind.target();
    next.updated_at = now;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use consulta_core::{AppointmentId, CompanyId, Role, Urgency};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn t1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
    }

    fn uid(s: &str) -> UserId {
        UserId::parse(s).unwrap()
    }

    fn admin() -> Actor {
        Actor::new(uid("admin-1"), Role::AdminEntreprise)
            .with_company(CompanyId::parse("acme").unwrap())
    }

    fn requester() -> Actor {
        Actor::new(uid("emp-1"), Role::Employe)
    }

    fn consultant(id: &str) -> Actor {
        Actor::new(uid(id), Role::Consultant)
    }

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: AppointmentId::parse("A1").unwrap(),
            title: "Bilan RH".into(),
            description: String::new(),
            scheduled_at: t0(),
            duration: 60,
            status,
            urgency: Urgency::Normal,
            requester: uid("emp-1"),
            consultant: status.requires_consultant().then(|| uid("consultant-7")),
            company: Some(CompanyId::parse("acme").unwrap()),
            meeting_url: None,
            notes: None,
            completed_at: (status == AppointmentStatus::Completed).then(t0),
            created_at: t0(),
            updated_at: t0(),
        }
    }

    fn action_for(kind: ActionKind) -> Action {
        match kind {
            ActionKind::Assign => Action::Assign {
                consultant: uid("consultant-7"),
                notes: None,
            },
            ActionKind::Accept => Action::Accept { meeting_url: None },
            ActionKind::Refuse => Action::Refuse { reason: None },
            ActionKind::Reject => Action::Reject { reason: None },
            ActionKind::Cancel => Action::Cancel { reason: None },
            ActionKind::Complete => Action::Complete {
                actual_duration: 45,
                notes: None,
            },
        }
    }

    fn arb_status() -> impl Strategy<Value = AppointmentStatus> {
        proptest::sample::select(AppointmentStatus::iter().collect::<Vec<_>>())
    }

    fn arb_kind() -> impl Strategy<Value = ActionKind> {
        proptest::sample::select(ActionKind::iter().collect::<Vec<_>>())
    }

    #[test]
    fn legal_pairs_match_the_table() {
        use AppointmentStatus::*;
        assert_eq!(
            ActionKind::available_from(Pending),
            vec![ActionKind::Assign, ActionKind::Reject, ActionKind::Cancel]
        );
        assert_eq!(
            ActionKind::available_from(Assigned),
            vec![
                ActionKind::Accept,
                ActionKind::Refuse,
                ActionKind::Reject,
                ActionKind::Cancel
            ]
        );
        assert_eq!(
            ActionKind::available_from(Confirmed),
            vec![ActionKind::Cancel, ActionKind::Complete]
        );
        for terminal in [Rejected, Completed, Canceled] {
            assert!(ActionKind::available_from(terminal).is_empty());
        }
    }

    #[test]
    fn action_kind_parses_case_insensitively() {
        assert_eq!(ActionKind::from_str("ACCEPT").unwrap(), ActionKind::Accept);
        assert_eq!(ActionKind::from_str("complete").unwrap(), ActionKind::Complete);
        assert!(ActionKind::from_str("approve").is_err());
    }

    #[test]
    fn assign_sets_consultant_and_appends_notes() {
        let mut current = appointment(AppointmentStatus::Pending);
        current.notes = Some("urgent".into());
        let action = Action::Assign {
            consultant: uid("consultant-7"),
            notes: Some("expert paie".into()),
        };
        let next = plan(&current, &action, &admin(), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Assigned);
        assert_eq!(next.consultant, Some(uid("consultant-7")));
        assert_eq!(next.notes.as_deref(), Some("urgent\nexpert paie"));
        assert_eq!(next.updated_at, t1());
        assert_eq!(current.status, AppointmentStatus::Pending);
    }

    #[test]
    fn only_admins_assign_and_reject() {
        let current = appointment(AppointmentStatus::Pending);
        for kind in [ActionKind::Assign, ActionKind::Reject] {
            let err = plan(&current, &action_for(kind), &requester(), t1()).unwrap_err();
            assert!(matches!(err, ConsultaError::Forbidden { role: Role::Employe, .. }));
        }
    }

    #[test]
    fn accept_requires_the_assigned_consultant_or_admin() {
        let current = appointment(AppointmentStatus::Assigned);
        let accept = Action::Accept { meeting_url: None };

        let err = plan(&current, &accept, &consultant("consultant-9"), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Forbidden { action: "accept", .. }));

        let next = plan(&current, &accept, &consultant("consultant-7"), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Confirmed);
        assert!(next.meeting_url.is_none());

        let next = plan(&current, &accept, &admin(), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn accept_stores_supplied_meeting_url() {
        let current = appointment(AppointmentStatus::Assigned);
        let accept = Action::Accept {
            meeting_url: Some("https://meet.example.com/abc".into()),
        };
        let next = plan(&current, &accept, &consultant("consultant-7"), t1()).unwrap();
        assert_eq!(next.meeting_url.as_deref(), Some("https://meet.example.com/abc"));

        let blank = Action::Accept {
            meeting_url: Some("  ".into()),
        };
        let err = plan(&current, &blank, &consultant("consultant-7"), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Validation(_)));
    }

    #[test]
    fn refuse_is_for_the_assigned_consultant_only() {
        let current = appointment(AppointmentStatus::Assigned);
        let refuse = Action::Refuse { reason: None };

        let err = plan(&current, &refuse, &admin(), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Forbidden { .. }));

        let next = plan(&current, &refuse, &consultant("consultant-7"), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Rejected);
        assert_eq!(next.notes.as_deref(), Some(DEFAULT_REFUSE_NOTE));
    }

    #[test]
    fn reject_uses_reason_or_default_note() {
        let current = appointment(AppointmentStatus::Pending);
        let next = plan(
            &current,
            &Action::Reject {
                reason: Some("not needed".into()),
            },
            &admin(),
            t1(),
        )
        .unwrap();
        assert_eq!(next.notes.as_deref(), Some("not needed"));

        let next = plan(&current, &Action::Reject { reason: None }, &admin(), t1()).unwrap();
        assert_eq!(next.notes.as_deref(), Some(DEFAULT_REJECT_NOTE));
    }

    #[test]
    fn cancel_by_requester_or_admin() {
        let current = appointment(AppointmentStatus::Confirmed);
        let cancel = Action::Cancel {
            reason: Some("conflit d'agenda".into()),
        };

        let next = plan(&current, &cancel, &requester(), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Canceled);
        assert_eq!(next.notes.as_deref(), Some("conflit d'agenda"));

        let stranger = Actor::new(uid("emp-2"), Role::Employe);
        let err = plan(&current, &cancel, &stranger, t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Forbidden { .. }));

        let err = plan(&current, &cancel, &consultant("consultant-7"), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Forbidden { .. }));
    }

    #[test]
    fn complete_records_actual_duration() {
        let current = appointment(AppointmentStatus::Confirmed);
        let action = Action::Complete {
            actual_duration: 45,
            notes: Some("session ran short".into()),
        };
        let next = plan(&current, &action, &consultant("consultant-7"), t1()).unwrap();
        assert_eq!(next.status, AppointmentStatus::Completed);
        assert_eq!(next.duration, 45);
        assert_eq!(next.completed_at, Some(t1()));
        assert_eq!(next.notes.as_deref(), Some("session ran short"));
    }

    #[test]
    fn zero_duration_is_a_validation_error() {
        let current = appointment(AppointmentStatus::Confirmed);
        let action = Action::Complete {
            actual_duration: 0,
            notes: None,
        };
        let err = plan(&current, &action, &admin(), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Validation(_)));
    }

    #[test]
    fn state_is_checked_before_permission_and_arguments() {
        let current = appointment(AppointmentStatus::Completed);
        let action = Action::Complete {
            actual_duration: 0,
            notes: None,
        };
        let err = plan(&current, &action, &requester(), t1()).unwrap_err();
        assert!(matches!(
            err,
            ConsultaError::InvalidState {
                action: "complete",
                status: AppointmentStatus::Completed
            }
        ));

        let current = appointment(AppointmentStatus::Confirmed);
        let err = plan(&current, &action, &requester(), t1()).unwrap_err();
        assert!(matches!(err, ConsultaError::Forbidden { .. }));
    }

    #[test]
    fn pending_cannot_be_accepted_directly() {
        let current = appointment(AppointmentStatus::Pending);
        let err = plan(&current, &Action::Accept { meeting_url: None }, &admin(), t1())
            .unwrap_err();
        assert!(matches!(err, ConsultaError::InvalidState { .. }));
    }

    proptest! {
        #[test]
        fn illegal_pairs_are_invalid_state(status in arb_status(), kind in arb_kind()) {
            prop_assume!(!kind.allowed_from(status));
            let current = appointment(status);
            let err = plan(&current, &action_for(kind), &admin(), t1()).unwrap_err();
            let is_invalid_state = matches!(err, ConsultaError::InvalidState { .. });
            prop_assert!(is_invalid_state);
        }

        #[test]
        fn terminal_states_are_final(status in arb_status(), kind in arb_kind()) {
            prop_assume!(status.is_terminal());
            let current = appointment(status);
            for actor in [admin(), requester(), consultant("consultant-7")] {
                let result = plan(&current, &action_for(kind), &actor, t1());
                let is_invalid_state = matches!(result, Err(ConsultaError::InvalidState { .. }));
                prop_assert!(is_invalid_state);
            }
        }

        #[test]
        fn successful_plans_keep_record_invariants(status in arb_status(), kind in arb_kind()) {
            let current = appointment(status);
            if let Ok(next) = plan(&current, &action_for(kind), &admin(), t1()) {
                prop_assert_eq!(next.status, kind.target());
                prop_assert_eq!(next.id, current.id);
                prop_assert_eq!(next.requester, current.requester);
                prop_assert_eq!(next.updated_at, t1());
                if next.status.requires_consultant() {
                    prop_assert!(next.consultant.is_some());
                }
                prop_assert_eq!(
                    next.completed_at.is_some(),
                    next.status == AppointmentStatus::Completed
                );
            }
        }
    }
}
