// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events handed to the notification sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{AppointmentId, UserId};

/// What happened to an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AppointmentRequested,
    ConsultantAssigned,
    AppointmentConfirmed,
    AppointmentRefused,
    AppointmentRejected,
    AppointmentCanceled,
    AppointmentCompleted,
}

/// Emitted after every successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub appointment_id: AppointmentId,
    pub actor_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<UserId>,
    pub timestamp: DateTime<Utc>,
}
