// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Consulta appointment service.
//!
//! Maps REST verbs onto [`LifecycleService`](consulta_lifecycle::LifecycleService)
//! operations. The caller's identity arrives in `X-Actor-*` headers set by the
//! upstream session provider; `/v1` routes can additionally require a bearer
//! token.

pub mod actor;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod json;
pub mod server;

pub use auth::AuthConfig;
pub use error::ApiError;
pub use json::ApiJson;
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
