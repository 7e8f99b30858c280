// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Consulta appointment service.
//!
//! This crate provides the domain model (appointments, consultants, actors),
//! the error taxonomy, and the adapter traits that storage backends,
//! notification sinks, and meeting provisioners implement.

pub mod appointment;
pub mod consultant;
pub mod error;
pub mod event;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use appointment::{Appointment, AppointmentFilter, AppointmentStatus, NewAppointment, Urgency};
pub use consultant::ConsultantProfile;
pub use error::{ConsultaError, ErrorKind};
pub use event::{EventKind, LifecycleEvent};
pub use types::{Actor, AppointmentId, CompanyId, HealthStatus, Role, UserId};

pub use traits::{
    Adapter, AppointmentStore, Clock, ConsultantDirectory, MeetingProvisioner, NotificationSink,
    SystemClock,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consulta_error_has_all_variants() {
        let _not_found = ConsultaError::NotFound {
            entity: "appointment",
            id: "a1".into(),
        };
        let _invalid = ConsultaError::InvalidState {
            action: "accept",
            status: AppointmentStatus::Pending,
        };
        let _race = ConsultaError::ConcurrentModification {
            id: "a1".into(),
            expected: AppointmentStatus::Assigned,
        };
        let _validation = ConsultaError::Validation("bad".into());
        let _forbidden = ConsultaError::Forbidden {
            action: "assign",
            role: Role::Employe,
        };
        let _storage = ConsultaError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _internal = ConsultaError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_store<T: AppointmentStore>() {}
        fn _assert_directory<T: ConsultantDirectory>() {}
        fn _assert_sink<T: NotificationSink>() {}
        fn _assert_provisioner<T: MeetingProvisioner>() {}
        fn _assert_clock<T: Clock>() {}
        _assert_clock::<SystemClock>();
    }
}
