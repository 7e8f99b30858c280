// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appointment CRUD and the conditional status update.

use std::str::FromStr;

use consulta_core::types::{format_timestamp, parse_timestamp};
use consulta_core::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, CompanyId, ConsultaError,
    Urgency, UserId,
};
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, title, description, scheduled_at, duration, status, urgency, \
     requester_id, consultant_id, company_id, meeting_url, notes, completed_at, \
     created_at, updated_at";

/// A row as stored, before validation into an [`Appointment`].
#[derive(Debug)]
struct AppointmentRow {
    id: String,
    title: String,
    description: String,
    scheduled_at: String,
    duration: i64,
    status: String,
    urgency: String,
    requester_id: String,
    consultant_id: Option<String>,
    company_id: Option<String>,
    meeting_url: Option<String>,
    notes: Option<String>,
    completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl AppointmentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            scheduled_at: row.get(3)?,
            duration: row.get(4)?,
            status: row.get(5)?,
            urgency: row.get(6)?,
            requester_id: row.get(7)?,
            consultant_id: row.get(8)?,
            company_id: row.get(9)?,
            meeting_url: row.get(10)?,
            notes: row.get(11)?,
            completed_at: row.get(12)?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }

    fn into_appointment(self) -> Result<Appointment, ConsultaError> {
        let corrupt = |what: &str, value: &str| {
            ConsultaError::Internal(format!("stored appointment {} has invalid {what} `{value}`", self.id))
        };
        let status = AppointmentStatus::from_str(&self.status)
            .map_err(|_| corrupt("status", &self.status))?;
        let urgency =
            Urgency::from_str(&self.urgency).map_err(|_| corrupt("urgency", &self.urgency))?;
        let duration = u32::try_from(self.duration)
            .map_err(|_| corrupt("duration", &self.duration.to_string()))?;

        Ok(Appointment {
            id: AppointmentId::parse(self.id.clone())?,
            title: self.title,
            description: self.description,
            scheduled_at: parse_timestamp(&self.scheduled_at)?,
            duration,
            status,
            urgency,
            requester: UserId::parse(self.requester_id)?,
            consultant: self.consultant_id.map(UserId::parse).transpose()?,
            company: self.company_id.map(CompanyId::parse).transpose()?,
            meeting_url: self.meeting_url,
            notes: self.notes,
            completed_at: self
                .completed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Owned column values for an insert or update.
struct AppointmentParams {
    id: String,
    title: String,
    description: String,
    scheduled_at: String,
    duration: i64,
    status: String,
    urgency: String,
    requester_id: String,
    consultant_id: Option<String>,
    company_id: Option<String>,
    meeting_url: Option<String>,
    notes: Option<String>,
    completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<&Appointment> for AppointmentParams {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id.to_string(),
            title: a.title.clone(),
            description: a.description.clone(),
            scheduled_at: format_timestamp(&a.scheduled_at),
            duration: i64::from(a.duration),
            status: a.status.to_string(),
            urgency: a.urgency.to_string(),
            requester_id: a.requester.to_string(),
            consultant_id: a.consultant.as_ref().map(ToString::to_string),
            company_id: a.company.as_ref().map(ToString::to_string),
            meeting_url: a.meeting_url.clone(),
            notes: a.notes.clone(),
            completed_at: a.completed_at.as_ref().map(format_timestamp),
            created_at: format_timestamp(&a.created_at),
            updated_at: format_timestamp(&a.updated_at),
        }
    }
}

/// Insert a new appointment. A duplicate id is a validation error.
pub async fn insert_appointment(db: &Database, appointment: &Appointment) -> Result<(), ConsultaError> {
    let p = AppointmentParams::from(appointment);
    let id = p.id.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let exists = tx
                .query_row(
                    "SELECT 1 FROM appointments WHERE id = ?1",
                    params![p.id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if exists {
                return Ok(0);
            }
            let inserted = tx.execute(
                "INSERT INTO appointments (id, title, description, scheduled_at, duration,
                     status, urgency, requester_id, consultant_id, company_id, meeting_url, notes,
                     completed_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    p.id,
                    p.title,
                    p.description,
                    p.scheduled_at,
                    p.duration,
                    p.status,
                    p.urgency,
                    p.requester_id,
                    p.consultant_id,
                    p.company_id,
                    p.meeting_url,
                    p.notes,
                    p.completed_at,
                    p.created_at,
                    p.updated_at,
                ],
            )?;
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)?;

    if inserted == 0 {
        return Err(ConsultaError::Validation(format!(
            "appointment {id} already exists"
        )));
    }
    Ok(())
}

/// Get an appointment by id.
pub async fn get_appointment(
    db: &Database,
    id: &AppointmentId,
) -> Result<Option<Appointment>, ConsultaError> {
    let id = id.to_string();
    let row = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM appointments WHERE id = ?1"),
                params![id],
                AppointmentRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    row.map(AppointmentRow::into_appointment).transpose()
}

/// List appointments matching every set predicate of `filter`,
/// ordered by `scheduled_at` then `id`.
pub async fn list_appointments(
    db: &Database,
    filter: &AppointmentFilter,
) -> Result<Vec<Appointment>, ConsultaError> {
    let mut clauses = Vec::new();
    let mut values: Vec<String> = Vec::new();
    let mut push = |column: &str, value: String| {
        values.push(value);
        clauses.push(format!("{column} = ?{}", values.len()));
    };
    if let Some(requester) = &filter.requester {
        push("requester_id", requester.to_string());
    }
    if let Some(company) = &filter.company {
        push("company_id", company.to_string());
    }
    if let Some(consultant) = &filter.consultant {
        push("consultant_id", consultant.to_string());
    }
    if let Some(status) = filter.status {
        push("status", status.to_string());
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    let sql = format!("SELECT {COLUMNS} FROM appointments{where_clause} ORDER BY scheduled_at, id");

    let rows = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), AppointmentRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;

    rows.into_iter()
        .map(AppointmentRow::into_appointment)
        .collect()
}

/// Overwrite the stored record with `updated` if its stored status is still
/// `expected`.
///
/// The `WHERE status = ?` guard and the existence probe run in one closure on
/// the connection thread, so no other write can interleave.
pub async fn compare_and_swap(
    db: &Database,
    expected: AppointmentStatus,
    updated: &Appointment,
) -> Result<(), ConsultaError> {
    let p = AppointmentParams::from(updated);
    let id = p.id.clone();
    let expected_str = expected.to_string();

    let (changed, exists) = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE appointments SET title = ?2, description = ?3, scheduled_at = ?4,
                     duration = ?5, status = ?6, urgency = ?7, consultant_id = ?8,
                     company_id = ?9, meeting_url = ?10, notes = ?11, completed_at = ?12,
                     updated_at = ?13
                 WHERE id = ?1 AND status = ?14",
                params![
                    p.id,
                    p.title,
                    p.description,
                    p.scheduled_at,
                    p.duration,
                    p.status,
                    p.urgency,
                    p.consultant_id,
                    p.company_id,
                    p.meeting_url,
                    p.notes,
                    p.completed_at,
                    p.updated_at,
                    expected_str,
                ],
            )?;
            if changed > 0 {
                return Ok((changed, true));
            }
            let exists = conn
                .query_row(
                    "SELECT 1 FROM appointments WHERE id = ?1",
                    params![p.id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            Ok((changed, exists))
        })
        .await
        .map_err(map_tr_err)?;

    match (changed, exists) {
        (0, true) => Err(ConsultaError::ConcurrentModification { id, expected }),
        (0, false) => Err(ConsultaError::appointment_not_found(id)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use consulta_core::types::truncate_timestamp;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_appointment(id: &str, requester: &str, offset_hours: i64) -> Appointment {
        let now = truncate_timestamp(Utc::now());
        Appointment {
            id: AppointmentId::parse(id).unwrap(),
            title: format!("Consultation {id}"),
            description: "Quarterly review".into(),
            scheduled_at: now + Duration::hours(offset_hours),
            duration: 60,
            status: AppointmentStatus::Pending,
            urgency: Urgency::High,
            requester: UserId::parse(requester).unwrap(),
            consultant: None,
            company: Some(CompanyId::parse("acme").unwrap()),
            meeting_url: None,
            notes: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let (db, _dir) = setup_db().await;
        let appt = make_appointment("A1", "emp-1", 24);
        insert_appointment(&db, &appt).await.unwrap();

        let fetched = get_appointment(&db, &appt.id).await.unwrap().unwrap();
        assert_eq!(fetched, appt);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        let id = AppointmentId::parse("nope").unwrap();
        assert!(get_appointment(&db, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let (db, _dir) = setup_db().await;
        let appt = make_appointment("A1", "emp-1", 24);
        insert_appointment(&db, &appt).await.unwrap();
        let err = insert_appointment(&db, &appt).await.unwrap_err();
        assert!(matches!(err, ConsultaError::Validation(_)));
    }

    #[tokio::test]
    async fn list_filters_and_orders_by_schedule() {
        let (db, _dir) = setup_db().await;
        insert_appointment(&db, &make_appointment("A3", "emp-1", 72)).await.unwrap();
        insert_appointment(&db, &make_appointment("A1", "emp-1", 24)).await.unwrap();
        insert_appointment(&db, &make_appointment("A2", "emp-2", 48)).await.unwrap();

        let all = list_appointments(&db, &AppointmentFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);

        let mine = list_appointments(
            &db,
            &AppointmentFilter {
                requester: Some(UserId::parse("emp-1").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let ids: Vec<_> = mine.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);

        let assigned = list_appointments(
            &db,
            &AppointmentFilter {
                status: Some(AppointmentStatus::Assigned),
                company: Some(CompanyId::parse("acme").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(assigned.is_empty());
    }

    #[tokio::test]
    async fn compare_and_swap_applies_when_status_matches() {
        let (db, _dir) = setup_db().await;
        let appt = make_appointment("A1", "emp-1", 24);
        insert_appointment(&db, &appt).await.unwrap();

        let mut updated = appt.clone();
        updated.status = AppointmentStatus::Assigned;
        updated.consultant = Some(UserId::parse("consultant-7").unwrap());
        updated.updated_at = appt.updated_at + Duration::seconds(5);
        compare_and_swap(&db, AppointmentStatus::Pending, &updated)
            .await
            .unwrap();

        let fetched = get_appointment(&db, &appt.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn compare_and_swap_detects_stale_status() {
        let (db, _dir) = setup_db().await;
        let appt = make_appointment("A1", "emp-1", 24);
        insert_appointment(&db, &appt).await.unwrap();

        let mut canceled = appt.clone();
        canceled.status = AppointmentStatus::Canceled;
        compare_and_swap(&db, AppointmentStatus::Pending, &canceled)
            .await
            .unwrap();

        let mut assigned = appt.clone();
        assigned.status = AppointmentStatus::Assigned;
        assigned.consultant = Some(UserId::parse("consultant-7").unwrap());
        let err = compare_and_swap(&db, AppointmentStatus::Pending, &assigned)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConsultaError::ConcurrentModification {
                expected: AppointmentStatus::Pending,
                ..
            }
        ));

        let fetched = get_appointment(&db, &appt.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, AppointmentStatus::Canceled);
        assert!(fetched.consultant.is_none());
    }

    #[tokio::test]
    async fn compare_and_swap_on_missing_id_is_not_found() {
        let (db, _dir) = setup_db().await;
        let appt = make_appointment("ghost", "emp-1", 24);
        let err = compare_and_swap(&db, AppointmentStatus::Pending, &appt)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsultaError::NotFound { .. }));
    }
}
