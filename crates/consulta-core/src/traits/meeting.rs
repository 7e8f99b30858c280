// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Video-conferencing provisioning trait.

use async_trait::async_trait;

use crate::appointment::Appointment;
use crate::error::ConsultaError;

/// Supplies a meeting link when an appointment is confirmed.
#[async_trait]
pub trait MeetingProvisioner: Send + Sync {
    /// Returns an opaque meeting URL, or `None` when no link is available.
    async fn provision(&self, appointment: &Appointment) -> Result<Option<String>, ConsultaError>;
}
