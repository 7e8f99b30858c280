// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sinks for lifecycle events.
//!
//! [`EventBus`] fans events out to in-process subscribers over a tokio
//! broadcast channel. [`LogSink`] writes each event as a structured log line.
//! [`FanoutSink`] combines several sinks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use consulta_core::{ConsultaError, LifecycleEvent, NotificationSink};

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

/// Broadcast bus for lifecycle events.
///
/// Publishing never blocks. A subscriber that falls more than `capacity`
/// events behind skips the oldest ones and sees a `Lagged` error.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl NotificationSink for EventBus {
    async fn emit(&self, event: &LifecycleEvent) -> Result<(), ConsultaError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => debug!(kind = %event.kind, receivers, "event published"),
            // No subscribers is not a failure.
            Err(_) => debug!(kind = %event.kind, "event published with no subscribers"),
        }
        Ok(())
    }
}

/// Writes each event as a structured log line with a JSON payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn emit(&self, event: &LifecycleEvent) -> Result<(), ConsultaError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| ConsultaError::Internal(format!("failed to encode event: {e}")))?;
        info!(
            kind = %event.kind,
            appointment_id = %event.appointment_id,
            actor_id = %event.actor_id,
            payload = %payload,
            "lifecycle event"
        );
        Ok(())
    }
}

/// Delivers every event to each inner sink in order.
///
/// All sinks are attempted even when one fails; the first error is returned.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl NotificationSink for FanoutSink {
    async fn emit(&self, event: &LifecycleEvent) -> Result<(), ConsultaError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.emit(event).await {
                warn!(kind = %event.kind, error = %e, "notification sink failed");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
