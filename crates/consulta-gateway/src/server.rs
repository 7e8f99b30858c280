// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;

use axum::{
    Router, middleware as axum_middleware,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use consulta_core::ConsultaError;
use consulta_lifecycle::LifecycleService;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Data reported by the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    pub service_name: String,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            service_name: service_name.into(),
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub service: LifecycleService,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Gateway server configuration (mirrors `GatewayConfig` from consulta-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router.
///
/// - GET /health (no auth)
/// - GET, POST /v1/appointments
/// - GET /v1/appointments/stats
/// - GET, PATCH /v1/appointments/{id}
/// - GET /v1/appointments/{id}/candidates
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/v1/appointments/stats", get(handlers::get_stats))
        .route(
            "/v1/appointments/{id}",
            get(handlers::get_appointment).patch(handlers::transition_appointment),
        )
        .route(
            "/v1/appointments/{id}/candidates",
            get(handlers::list_candidates),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ConsultaError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConsultaError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ConsultaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use consulta_core::{ConsultantProfile, NotificationSink, UserId};
    use consulta_storage::MemoryStore;

    struct Quiet;

    #[async_trait::async_trait]
    impl NotificationSink for Quiet {
        async fn emit(
            &self,
            _event: &consulta_core::LifecycleEvent,
        ) -> Result<(), ConsultaError> {
            Ok(())
        }
    }

    async fn app(bearer_token: Option<&str>) -> Router {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_consultant(&ConsultantProfile::new(
                UserId::parse("consultant-7").unwrap(),
                "Alice Martin",
                "alice@example.com",
            ))
            .await
            .unwrap();
        let service = LifecycleService::new(store.clone(), store, Arc::new(Quiet));
        router(GatewayState {
            service,
            auth: AuthConfig {
                bearer_token: bearer_token.map(str::to_string),
            },
            health: HealthState::new("consulta-test"),
        })
    }

    fn call(method: &str, uri: &str, actor: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = actor {
            builder = builder
                .header("x-actor-id", id)
                .header("x-actor-role", role)
                .header("x-actor-company", "acme");
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const EMPLOYEE: Option<(&str, &str)> = Some(("emp-1", "EMPLOYE"));
    const ADMIN: Option<(&str, &str)> = Some(("admin-1", "ADMIN_ENTREPRISE"));
    const CONSULTANT: Option<(&str, &str)> = Some(("consultant-7", "consultant"));

    async fn create(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(call(
                "POST",
                "/v1/appointments",
                EMPLOYEE,
                Some(json!({
                    "title": "Bilan",
                    "scheduled_at": "2026-04-01T14:00:00Z",
                    "duration": 60
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "PENDING");
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = app(Some("secret")).await;
        let response = app.oneshot(call("GET", "/health", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "consulta-test");
    }

    #[tokio::test]
    async fn bearer_token_guards_api_routes() {
        let app = app(Some("secret")).await;
        let response = app
            .clone()
            .oneshot(call("GET", "/v1/appointments", EMPLOYEE, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = call("GET", "/v1/appointments", EMPLOYEE, None);
        request
            .headers_mut()
            .insert("authorization", "Bearer secret".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_actor_is_bad_request() {
        let app = app(None).await;
        let response = app
            .oneshot(call("GET", "/v1/appointments", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "validation");
    }

    #[tokio::test]
    async fn full_lifecycle_over_http() {
        let app = app(None).await;
        let id = create(&app).await;
        let uri = format!("/v1/appointments/{id}");

        let response = app
            .clone()
            .oneshot(call(
                "PATCH",
                &uri,
                ADMIN,
                Some(json!({ "action": "assign", "consultant_id": "consultant-7" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ASSIGNED");

        let response = app
            .clone()
            .oneshot(call("PATCH", &uri, CONSULTANT, Some(json!({ "action": "accept" }))))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["status"], "CONFIRMED");

        let response = app
            .clone()
            .oneshot(call(
                "PATCH",
                &uri,
                CONSULTANT,
                Some(json!({ "action": "complete", "actual_duration": 45 })),
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["status"], "COMPLETED");
        assert_eq!(body["duration"], 45);

        let response = app
            .clone()
            .oneshot(call("PATCH", &uri, ADMIN, Some(json!({ "action": "cancel" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["kind"], "invalid_state");

        let response = app
            .oneshot(call("GET", "/v1/appointments/stats?scope=company", ADMIN, None))
            .await
            .unwrap();
        let stats = json_body(response).await;
        assert_eq!(stats["completed"], 1);
        assert_eq!(stats["completion_rate"], 100.0);
    }

    #[tokio::test]
    async fn errors_map_to_statuses() {
        let app = app(None).await;
        let id = create(&app).await;

        let response = app
            .clone()
            .oneshot(call("GET", "/v1/appointments/nope", EMPLOYEE, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(call(
                "PATCH",
                &format!("/v1/appointments/{id}"),
                EMPLOYEE,
                Some(json!({ "action": "reject" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(call("GET", "/v1/appointments?scope=company", EMPLOYEE, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(call("GET", "/v1/appointments?status=active", EMPLOYEE, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors() {
        let app = app(None).await;

        let response = app
            .clone()
            .oneshot(call(
                "POST",
                "/v1/appointments",
                EMPLOYEE,
                Some(json!({
                    "title": "Bilan",
                    "scheduled_at": "2026-04-01T14:00:00Z",
                    "duration": -5
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "validation");
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("duration must be a positive number of minutes")
        );

        let response = app
            .clone()
            .oneshot(call(
                "POST",
                "/v1/appointments",
                EMPLOYEE,
                Some(json!({ "title": "Bilan", "scheduled_at": "2026-04-01T14:00:00Z" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "validation");

        let id = create(&app).await;
        let response = app
            .clone()
            .oneshot(call(
                "PATCH",
                &format!("/v1/appointments/{id}"),
                ADMIN,
                Some(json!({ "action": "complete", "actual_duration": -1 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "validation");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/appointments")
                    .header("x-actor-id", "emp-1")
                    .header("x-actor-role", "EMPLOYE")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "validation");
    }

    #[tokio::test]
    async fn reads_by_id_are_scoped_to_participants() {
        let app = app(None).await;
        let id = create(&app).await;

        let outsider = |uri: &str| {
            Request::builder()
                .method("GET")
                .uri(uri)
                .header("x-actor-id", "admin-9")
                .header("x-actor-role", "ADMIN_ENTREPRISE")
                .header("x-actor-company", "globex")
                .body(Body::empty())
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(outsider(&format!("/v1/appointments/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["kind"], "forbidden");

        let response = app
            .clone()
            .oneshot(outsider(&format!("/v1/appointments/{id}/candidates")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(call(
                "GET",
                &format!("/v1/appointments/{id}"),
                Some(("emp-2", "EMPLOYE")),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(call("GET", &format!("/v1/appointments/{id}"), ADMIN, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["id"], id.as_str());
    }

    #[tokio::test]
    async fn candidates_and_listing() {
        let app = app(None).await;
        let id = create(&app).await;

        let response = app
            .clone()
            .oneshot(call(
                "GET",
                &format!("/v1/appointments/{id}/candidates?q=alice"),
                ADMIN,
                None,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], "consultant-7");

        let response = app
            .oneshot(call("GET", "/v1/appointments?q=bilan", EMPLOYEE, None))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
    }
}
