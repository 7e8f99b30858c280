// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification sink for deterministic testing.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use consulta_core::{ConsultaError, EventKind, LifecycleEvent, NotificationSink};

/// Captures every emitted event for assertions.
///
/// When set to fail, `emit` still records the event and then returns an
/// error, so tests can check both that delivery was attempted and that the
/// failure did not undo the transition.
#[derive(Default)]
pub struct MockNotifier {
    events: Mutex<Vec<LifecycleEvent>>,
    failing: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every `emit` fails.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().await.clone()
    }

    pub async fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().await.iter().map(|e| e.kind).collect()
    }

    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

#[async_trait]
impl NotificationSink for MockNotifier {
    async fn emit(&self, event: &LifecycleEvent) -> Result<(), ConsultaError> {
        self.events.lock().await.push(event.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConsultaError::Internal("mock notifier failure".into()));
        }
        Ok(())
    }
}
