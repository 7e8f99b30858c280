// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment store trait for persistence backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::appointment::{Appointment, AppointmentFilter, AppointmentStatus};
use crate::error::ConsultaError;
use crate::traits::adapter::Adapter;
use crate::types::AppointmentId;

/// Persistence for appointment records.
///
/// Records are never hard-deleted; terminal states are retained for history.
#[async_trait]
pub trait AppointmentStore: Adapter {
    /// Insert a new record. Fails if the id already exists.
    async fn insert(&self, appointment: &Appointment) -> Result<(), ConsultaError>;

    /// Fetch a record by id, returning `None` if absent.
    async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, ConsultaError>;

    /// List records matching `filter`, ordered by `scheduled_at` then `id`.
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ConsultaError>;

    /// Replace the stored record with `updated` only if its stored status is
    /// still `expected`, as one atomic conditional write.
    ///
    /// Returns [`ConsultaError::ConcurrentModification`] when the status no
    /// longer matches and [`ConsultaError::NotFound`] when the id is unknown.
    /// On error nothing is written.
    async fn compare_and_swap(
        &self,
        expected: AppointmentStatus,
        updated: &Appointment,
    ) -> Result<(), ConsultaError>;
}
