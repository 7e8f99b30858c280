// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Consulta appointment service.

use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::appointment::AppointmentStatus;
use crate::types::Role;

/// The primary error type used across all Consulta traits and operations.
#[derive(Debug, Error)]
pub enum ConsultaError {
    /// A referenced appointment or consultant does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The requested transition is illegal from the current status.
    #[error("cannot {action} an appointment that is {status}")]
    InvalidState {
        action: &'static str,
        status: AppointmentStatus,
    },

    /// The stored status changed between read and conditional write.
    #[error("appointment {id} was modified concurrently (expected status {expected})")]
    ConcurrentModification {
        id: String,
        expected: AppointmentStatus,
    },

    /// Malformed input (non-positive duration, malformed id, blank title).
    #[error("validation error: {0}")]
    Validation(String),

    /// The actor's role or identity does not permit the requested action.
    #[error("{role} is not allowed to {action} this appointment")]
    Forbidden { action: &'static str, role: Role },

    /// Storage backend errors (connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`ConsultaError`], as shown to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    Validation,
    Forbidden,
    Storage,
    Internal,
}

impl ConsultaError {
    /// Classify this error. Concurrent modifications are reported as
    /// `InvalidState`: the precondition no longer held at write time.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidState { .. } | Self::ConcurrentModification { .. } => {
                ErrorKind::InvalidState
            }
            Self::Validation(_) => ErrorKind::Validation,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Storage { .. } => ErrorKind::Storage,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn appointment_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "appointment",
            id: id.to_string(),
        }
    }

    pub fn consultant_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "consultant",
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_modification_is_an_invalid_state() {
        let err = ConsultaError::ConcurrentModification {
            id: "a1".into(),
            expected: AppointmentStatus::Assigned,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn messages_are_user_displayable() {
        let err = ConsultaError::InvalidState {
            action: "cancel",
            status: AppointmentStatus::Completed,
        };
        assert_eq!(err.to_string(), "cannot cancel an appointment that is COMPLETED");

        let err = ConsultaError::Forbidden {
            action: "accept",
            role: Role::Consultant,
        };
        assert_eq!(err.to_string(), "CONSULTANT is not allowed to accept this appointment");

        let err = ConsultaError::appointment_not_found("A9");
        assert_eq!(err.to_string(), "appointment not found: A9");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::InvalidState).unwrap();
        assert_eq!(json, "\"invalid_state\"");
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
