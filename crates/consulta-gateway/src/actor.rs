// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extracts the calling [`Actor`] from `X-Actor-*` headers.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use consulta_core::{Actor, CompanyId, Role, UserId};

use crate::error::ApiError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
pub const ACTOR_COMPANY_HEADER: &str = "x-actor-company";

/// The authenticated caller, as asserted by the upstream session provider.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, ApiError> {
    match parts.headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|v| Some(v.trim()))
            .map_err(|_| ApiError::validation(format!("header {name} is not valid text"))),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)?
            .ok_or_else(|| ApiError::validation(format!("missing {ACTOR_ID_HEADER} header")))?;
        let role = header(parts, ACTOR_ROLE_HEADER)?
            .ok_or_else(|| ApiError::validation(format!("missing {ACTOR_ROLE_HEADER} header")))?;

        let id = UserId::parse(id)?;
        let role = Role::from_str(role)
            .map_err(|_| ApiError::validation(format!("unknown role `{role}`")))?;
        let mut actor = Actor::new(id, role);

        if let Some(company) = header(parts, ACTOR_COMPANY_HEADER)?.filter(|c| !c.is_empty()) {
            actor = actor.with_company(CompanyId::parse(company)?);
        }
        Ok(Self(actor))
    }
}
