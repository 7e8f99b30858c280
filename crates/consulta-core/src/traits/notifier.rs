// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink trait.

use async_trait::async_trait;

use crate::error::ConsultaError;
use crate::event::LifecycleEvent;

/// Fire-and-forget receiver of lifecycle events (in-app, toast, email).
///
/// Errors are reported to the caller for logging only; they never roll back
/// the transition that produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, event: &LifecycleEvent) -> Result<(), ConsultaError>;
}
