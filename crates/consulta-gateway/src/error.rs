// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use consulta_core::{ConsultaError, ErrorKind};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// User-displayable message.
    pub error: String,
    pub kind: ErrorKind,
}

/// A [`ConsultaError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub ConsultaError);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(ConsultaError::Validation(message.into()))
    }
}

impl From<ConsultaError> for ApiError {
    fn from(e: ConsultaError) -> Self {
        Self(e)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Storage | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %kind, "request rejected");
        }
        // Storage details stay in the log.
        let error = match kind {
            ErrorKind::Storage => "storage unavailable".to_string(),
            _ => self.0.to_string(),
        };
        (status, Json(ErrorResponse { error, kind })).into_response()
    }
}
