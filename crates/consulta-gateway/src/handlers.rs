// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the appointment REST API.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use consulta_core::{Appointment, AppointmentStatus, ConsultantProfile, HealthStatus, NewAppointment, UserId};
use consulta_lifecycle::{Action, ActionKind, AppointmentStats, ListQuery, ListScope};

use crate::actor::CurrentActor;
use crate::error::ApiError;
use crate::json::ApiJson;
use crate::server::GatewayState;

/// Query string for `GET /v1/appointments`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
}

/// Query string for `GET /v1/appointments/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub scope: Option<String>,
}

/// Query string for `GET /v1/appointments/{id}/candidates`.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Body for `PATCH /v1/appointments/{id}`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// One of `assign`, `accept`, `refuse`, `reject`, `cancel`, `complete`.
    pub action: String,
    #[serde(default)]
    pub consultant_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub actual_duration: Option<u32>,
    #[serde(default)]
    pub meeting_url: Option<String>,
}

impl TransitionRequest {
    fn into_action(self) -> Result<Action, ApiError> {
        let kind = ActionKind::from_str(self.action.trim())
            .map_err(|_| ApiError::validation(format!("unknown action `{}`", self.action)))?;
        let reason = self.reason.or(self.notes.clone());
        Ok(match kind {
            ActionKind::Assign => {
                let raw = self
                    .consultant_id
                    .ok_or_else(|| ApiError::validation("assign requires consultant_id"))?;
                Action::Assign {
                    consultant: UserId::parse(raw)?,
                    notes: self.notes,
                }
            }
            ActionKind::Accept => Action::Accept {
                meeting_url: self.meeting_url,
            },
            ActionKind::Refuse => Action::Refuse { reason },
            ActionKind::Reject => Action::Reject { reason },
            ActionKind::Cancel => Action::Cancel { reason },
            ActionKind::Complete => Action::Complete {
                actual_duration: self
                    .actual_duration
                    .ok_or_else(|| ApiError::validation("complete requires actual_duration"))?,
                notes: self.notes,
            },
        })
    }
}

/// Response body for appointment lists.
#[derive(Debug, Serialize)]
pub struct AppointmentList {
    pub appointments: Vec<Appointment>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn parse_scope(raw: Option<&str>) -> Result<ListScope, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ListScope::default()),
        Some(s) => {
            ListScope::from_str(s).map_err(|_| ApiError::validation(format!("unknown scope `{s}`")))
        }
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<AppointmentStatus>, ApiError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            AppointmentStatus::from_str(s)
                .map_err(|_| ApiError::validation(format!("unknown status `{s}`")))
        })
        .transpose()
}

/// GET /v1/appointments
pub async fn list_appointments(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<ListParams>,
) -> Result<Json<AppointmentList>, ApiError> {
    let query = ListQuery {
        scope: parse_scope(params.scope.as_deref())?,
        status: parse_status(params.status.as_deref())?,
        search: params.q,
    };
    let appointments = state.service.list(&actor, &query).await?;
    Ok(Json(AppointmentList { appointments }))
}

/// POST /v1/appointments
pub async fn create_appointment(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    ApiJson(body): ApiJson<NewAppointment>,
) -> Result<impl IntoResponse, ApiError> {
    let appointment = state.service.request(&actor, body).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /v1/appointments/stats
pub async fn get_stats(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Query(params): Query<StatsParams>,
) -> Result<Json<AppointmentStats>, ApiError> {
    let scope = parse_scope(params.scope.as_deref())?;
    Ok(Json(state.service.stats(&actor, scope).await?))
}

/// GET /v1/appointments/{id}
///
/// Readable by the requester, the assigned consultant, and company admins.
pub async fn get_appointment(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    Ok(Json(state.service.view(&actor, &id).await?))
}

/// PATCH /v1/appointments/{id}
pub async fn transition_appointment(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TransitionRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let action = body.into_action()?;
    Ok(Json(state.service.apply(&actor, &id, action).await?))
}

/// GET /v1/appointments/{id}/candidates
pub async fn list_candidates(
    State(state): State<GatewayState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Query(params): Query<CandidateParams>,
) -> Result<Json<Vec<ConsultantProfile>>, ApiError> {
    let ranked = state
        .service
        .candidates_for(&actor, &id, params.q.as_deref())
        .await?;
    Ok(Json(ranked))
}

/// GET /health
///
/// Unauthenticated. Returns 503 when the store is unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> impl IntoResponse {
    let (code, status, detail) = match state.service.health().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "healthy", None),
        Ok(HealthStatus::Degraded(d)) => (StatusCode::OK, "degraded", Some(d)),
        Ok(HealthStatus::Unhealthy(d)) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(d)),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            Some(e.to_string()),
        ),
    };
    let body = HealthResponse {
        status: status.to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        detail,
    };
    (code, Json(body))
}
