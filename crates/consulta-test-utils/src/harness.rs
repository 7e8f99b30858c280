// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end lifecycle testing.
//!
//! `TestHarness` assembles a [`LifecycleService`] over a temp SQLite database
//! (or the in-memory store), a [`MockNotifier`], and a [`ManualClock`], with
//! the fixture consultants already in the directory.

use std::sync::Arc;

use consulta_config::AvailabilityPolicy;
use consulta_config::model::StorageConfig;
use consulta_core::{
    Appointment, AppointmentId, AppointmentStore, ConsultaError, ConsultantDirectory,
};
use consulta_lifecycle::{LifecycleService, UrlTemplateProvisioner};
use consulta_storage::{MemoryStore, SqliteStore};

use crate::clock::ManualClock;
use crate::fixtures;
use crate::mock_notifier::MockNotifier;

/// Which store backs the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    store: StoreKind,
    policy: AvailabilityPolicy,
    failing_notifier: bool,
    meeting_base_url: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            store: StoreKind::Sqlite,
            policy: AvailabilityPolicy::Advisory,
            failing_notifier: false,
            meeting_base_url: None,
        }
    }

    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = store;
        self
    }

    pub fn with_policy(mut self, policy: AvailabilityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Make every notification fail.
    pub fn with_failing_notifier(mut self) -> Self {
        self.failing_notifier = true;
        self
    }

    pub fn with_meeting_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.meeting_base_url = Some(base_url.into());
        self
    }

    pub async fn build(self) -> Result<TestHarness, ConsultaError> {
        let (store, directory, temp_dir): (
            Arc<dyn AppointmentStore>,
            Arc<dyn ConsultantDirectory>,
            Option<tempfile::TempDir>,
        ) = match self.store {
            StoreKind::Sqlite => {
                let temp_dir = tempfile::TempDir::new()
                    .map_err(|e| ConsultaError::Storage { source: e.into() })?;
                let config = StorageConfig {
                    database_path: temp_dir
                        .path()
                        .join("test.db")
                        .to_string_lossy()
                        .into_owned(),
                    wal_mode: true,
                };
                let sqlite = Arc::new(SqliteStore::new(config));
                sqlite.initialize().await?;
                for profile in fixtures::consultants() {
                    sqlite.upsert_consultant(&profile).await?;
                }
                let store: Arc<dyn AppointmentStore> = sqlite.clone();
                let directory: Arc<dyn ConsultantDirectory> = sqlite;
                (store, directory, Some(temp_dir))
            }
            StoreKind::Memory => {
                let memory = Arc::new(MemoryStore::new());
                for profile in fixtures::consultants() {
                    memory.upsert_consultant(&profile).await?;
                }
                let store: Arc<dyn AppointmentStore> = memory.clone();
                let directory: Arc<dyn ConsultantDirectory> = memory;
                (store, directory, None)
            }
        };

        let notifier = Arc::new(if self.failing_notifier {
            MockNotifier::failing()
        } else {
            MockNotifier::new()
        });
        let clock = Arc::new(ManualClock::default());

        let service = LifecycleService::new(store.clone(), directory, notifier.clone())
            .with_clock(clock.clone())
            .with_policy(self.policy)
            .with_provisioner(Arc::new(UrlTemplateProvisioner::new(self.meeting_base_url)));

        Ok(TestHarness {
            service,
            store,
            notifier,
            clock,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete lifecycle environment with mock collaborators.
pub struct TestHarness {
    pub service: LifecycleService,
    /// Direct store access for before/after comparisons.
    pub store: Arc<dyn AppointmentStore>,
    pub notifier: Arc<MockNotifier>,
    pub clock: Arc<ManualClock>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Read a record straight from the store, bypassing the service.
    pub async fn stored(&self, id: &AppointmentId) -> Result<Option<Appointment>, ConsultaError> {
        self.store.get(id).await
    }
}
