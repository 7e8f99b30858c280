// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the store and directory traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use consulta_config::model::StorageConfig;
use consulta_core::{
    Adapter, Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, AppointmentStore,
    ConsultaError, ConsultantDirectory, ConsultantProfile, HealthStatus, UserId,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed appointment store and consultant directory.
///
/// The database is lazily opened by [`SqliteStore::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and apply migrations.
    pub async fn initialize(&self) -> Result<(), ConsultaError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ConsultaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Insert or replace a consultant profile in the directory.
    pub async fn upsert_consultant(&self, profile: &ConsultantProfile) -> Result<(), ConsultaError> {
        queries::consultants::upsert_consultant(self.db()?, profile).await
    }

    fn db(&self) -> Result<&Database, ConsultaError> {
        self.db.get().ok_or_else(|| ConsultaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl Adapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ConsultaError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConsultaError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for SqliteStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), ConsultaError> {
        queries::appointments::insert_appointment(self.db()?, appointment).await
    }

    async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, ConsultaError> {
        queries::appointments::get_appointment(self.db()?, id).await
    }

    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, ConsultaError> {
        queries::appointments::list_appointments(self.db()?, filter).await
    }

    async fn compare_and_swap(
        &self,
        expected: AppointmentStatus,
        updated: &Appointment,
    ) -> Result<(), ConsultaError> {
        queries::appointments::compare_and_swap(self.db()?, expected, updated).await
    }
}

#[async_trait]
impl ConsultantDirectory for SqliteStore {
    async fn get_consultant(&self, id: &UserId) -> Result<Option<ConsultantProfile>, ConsultaError> {
        queries::consultants::get_consultant(self.db()?, id).await
    }

    async fn list_consultants(&self) -> Result<Vec<ConsultantProfile>, ConsultaError> {
        queries::consultants::list_consultants(self.db()?).await
    }
}
