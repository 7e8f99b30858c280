// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers, actors, and other common types shared across crates.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ConsultaError;

/// Maximum accepted length of an identifier, in bytes.
pub const MAX_ID_LEN: usize = 128;

/// Timestamp format used for persistence and logs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn validate_id(kind: &str, raw: &str) -> Result<(), ConsultaError> {
    if raw.trim().is_empty() {
        return Err(ConsultaError::Validation(format!("{kind} id must not be empty")));
    }
    if raw.len() > MAX_ID_LEN {
        return Err(ConsultaError::Validation(format!(
            "{kind} id must be at most {MAX_ID_LEN} bytes, got {}",
            raw.len()
        )));
    }
    if raw.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(ConsultaError::Validation(format!(
            "{kind} id `{}` contains whitespace or control characters",
            raw.escape_debug()
        )));
    }
    Ok(())
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an identifier.
            pub fn parse(raw: impl Into<String>) -> Result<Self, ConsultaError> {
                let raw = raw.into();
                validate_id($kind, &raw)?;
                Ok(Self(raw))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ConsultaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ConsultaError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for an appointment.
    AppointmentId,
    "appointment"
);

define_id!(
    /// Unique identifier for a user (requester or consultant).
    UserId,
    "user"
);

define_id!(
    /// Unique identifier for a customer organization.
    CompanyId,
    "company"
);

impl AppointmentId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Role of an authenticated actor, as supplied by the session provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Employee of a customer company; requests consultations.
    Employe,
    /// Company administrator; assigns, rejects, and cancels.
    AdminEntreprise,
    /// Consultant fulfilling consultations.
    Consultant,
    /// Trainer running formations.
    Formateur,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::AdminEntreprise
    }
}

/// The authenticated caller of a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    /// Organization the actor belongs to, if any.
    #[serde(default)]
    pub company: Option<CompanyId>,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            company: None,
        }
    }

    pub fn with_company(mut self, company: CompanyId) -> Self {
        self.company = Some(company);
        self
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Truncate a timestamp to the millisecond precision used in storage.
pub fn truncate_timestamp(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}

/// Format a timestamp for persistence.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written by [`format_timestamp`].
///
/// Falls back to RFC 3339 so rows written by other tools still load.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ConsultaError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ConsultaError::Validation(format!("invalid timestamp `{raw}`: {e}")))
}
