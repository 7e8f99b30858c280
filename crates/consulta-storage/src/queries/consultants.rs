// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consultant directory rows.

use consulta_core::{ConsultaError, ConsultantProfile, UserId};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, name, email, specialties, is_available, total_sessions, rating, \
     success_rate, response_time_minutes";

struct ConsultantRow {
    id: String,
    name: String,
    email: String,
    specialties: String,
    is_available: bool,
    total_sessions: i64,
    rating: f64,
    success_rate: f64,
    response_time_minutes: i64,
}

impl ConsultantRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            specialties: row.get(3)?,
            is_available: row.get(4)?,
            total_sessions: row.get(5)?,
            rating: row.get(6)?,
            success_rate: row.get(7)?,
            response_time_minutes: row.get(8)?,
        })
    }

    fn into_profile(self) -> Result<ConsultantProfile, ConsultaError> {
        let specialties: Vec<String> = serde_json::from_str(&self.specialties).map_err(|e| {
            ConsultaError::Internal(format!(
                "stored consultant {} has malformed specialties: {e}",
                self.id
            ))
        })?;
        Ok(ConsultantProfile {
            id: UserId::parse(self.id)?,
            name: self.name,
            email: self.email,
            specialties,
            is_available: self.is_available,
            total_sessions: u32::try_from(self.total_sessions).unwrap_or(0),
            rating: self.rating,
            success_rate: self.success_rate,
            response_time_minutes: u32::try_from(self.response_time_minutes).unwrap_or(0),
        })
    }
}

/// Insert or replace a consultant profile.
pub async fn upsert_consultant(
    db: &Database,
    profile: &ConsultantProfile,
) -> Result<(), ConsultaError> {
    let specialties = serde_json::to_string(&profile.specialties).map_err(|e| {
        ConsultaError::Internal(format!("failed to encode specialties: {e}"))
    })?;
    let profile = profile.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO consultants (id, name, email, specialties, is_available,
                     total_sessions, rating, success_rate, response_time_minutes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     email = excluded.email,
                     specialties = excluded.specialties,
                     is_available = excluded.is_available,
                     total_sessions = excluded.total_sessions,
                     rating = excluded.rating,
                     success_rate = excluded.success_rate,
                     response_time_minutes = excluded.response_time_minutes",
                params![
                    profile.id.as_str(),
                    profile.name,
                    profile.email,
                    specialties,
                    profile.is_available,
                    profile.total_sessions,
                    profile.rating,
                    profile.success_rate,
                    profile.response_time_minutes,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a consultant by id.
pub async fn get_consultant(
    db: &Database,
    id: &UserId,
) -> Result<Option<ConsultantProfile>, ConsultaError> {
    let id = id.to_string();
    let row = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM consultants WHERE id = ?1"),
                params![id],
                ConsultantRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    row.map(ConsultantRow::into_profile).transpose()
}

/// List every consultant, ordered by name.
pub async fn list_consultants(db: &Database) -> Result<Vec<ConsultantProfile>, ConsultaError> {
    let rows = db
        .connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM consultants ORDER BY name, id"))?;
            let rows = stmt.query_map([], ConsultantRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter().map(ConsultantRow::into_profile).collect()
}
