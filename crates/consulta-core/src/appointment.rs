// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The appointment record and its status enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::{AppointmentId, CompanyId, UserId};

/// Lifecycle status of an appointment.
///
/// This is the single authoritative status field. Parsing is case-insensitive
/// so loosely-cased strings (`pending`, `Pending`) normalize at the boundary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Assigned,
    Confirmed,
    Rejected,
    Completed,
    #[strum(to_string = "CANCELED", serialize = "CANCELLED")]
    #[serde(alias = "CANCELLED")]
    Canceled,
}

impl AppointmentStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Canceled)
    }

    /// Whether a record in this status must reference a consultant.
    pub fn requires_consultant(self) -> bool {
        matches!(self, Self::Assigned | Self::Confirmed | Self::Completed)
    }
}

/// Informational urgency of a request. Never gates a transition.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
}

/// A consultation request tracked through the status lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub description: String,
    /// Planned start.
    pub scheduled_at: DateTime<Utc>,
    /// Planned length in minutes; overwritten with the real length on completion.
    pub duration: u32,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub urgency: Urgency,
    /// User who created the request. Immutable.
    pub requester: UserId,
    /// Assigned consultant; `None` exactly while `PENDING`.
    #[serde(default)]
    pub consultant: Option<UserId>,
    /// Requester's organization, denormalized for company-scoped queries.
    #[serde(default)]
    pub company: Option<CompanyId>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set exactly when the status becomes `COMPLETED`.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Append a note on a new line, ignoring blank input.
    pub fn append_note(&mut self, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            return;
        }
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{note}"),
            _ => note.to_string(),
        });
    }
}

/// Input for creating a new appointment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    /// Planned length in minutes.
    #[serde(deserialize_with = "positive_minutes")]
    pub duration: u32,
    #[serde(default)]
    pub urgency: Option<Urgency>,
}

/// Reads a duration in minutes, rejecting zero and negative values.
fn positive_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    u32::try_from(raw)
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| {
            serde::de::Error::custom(format!(
                "duration must be a positive number of minutes, got {raw}"
            ))
        })
}

/// Foreign-key and status predicates for listing appointments.
///
/// All set predicates must match. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub requester: Option<UserId>,
    pub company: Option<CompanyId>,
    pub consultant: Option<UserId>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(requester) = &self.requester {
            if &appointment.requester != requester {
                return false;
            }
        }
        if let Some(company) = &self.company {
            if appointment.company.as_ref() != Some(company) {
                return false;
            }
        }
        if let Some(consultant) = &self.consultant {
            if appointment.consultant.as_ref() != Some(consultant) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if appointment.status != status {
                return false;
            }
        }
        true
    }
}
