// SPDX-FileCopyrightText: 2026 Consulta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `consulta serve` command implementation.
//!
//! Opens the appointment store, wires the notification sinks and the
//! lifecycle service, and runs the HTTP gateway until Ctrl-C.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use consulta_bus::{EventBus, FanoutSink, LogSink};
use consulta_config::ConsultaConfig;
use consulta_core::{Adapter, AppointmentStore, ConsultaError, ConsultantDirectory};
use consulta_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig};
use consulta_lifecycle::{LifecycleService, UrlTemplateProvisioner};
use consulta_storage::{MemoryStore, SqliteStore};

/// Runs the `consulta serve` command.
pub async fn run_serve(config: ConsultaConfig, ephemeral: bool) -> Result<(), ConsultaError> {
    init_tracing(&config.service.log_level);

    info!(ephemeral, "starting consulta serve");

    let (store, directory): (Arc<dyn AppointmentStore>, Arc<dyn ConsultantDirectory>) =
        if ephemeral {
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        } else {
            let store = SqliteStore::new(config.storage.clone());
            store.initialize().await?;
            let store = Arc::new(store);
            (store.clone(), store)
        };
    info!(store = store.name(), "appointment store ready");

    let bus = EventBus::default();
    spawn_event_monitor(&bus);
    let sink = FanoutSink::new()
        .with(Arc::new(bus))
        .with(Arc::new(LogSink));

    let service = LifecycleService::new(store.clone(), directory, Arc::new(sink))
        .with_provisioner(Arc::new(UrlTemplateProvisioner::from_config(&config.meeting)))
        .with_policy(config.lifecycle.availability_policy);
    info!(
        policy = %service.policy(),
        meeting_links = config.meeting.base_url.is_some(),
        "lifecycle service initialized"
    );

    let state = GatewayState {
        service,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        health: HealthState::new(config.service.name.clone()),
    };
    if state.auth.bearer_token.is_none() {
        warn!("gateway bearer token not set; /v1 routes are unauthenticated");
    }

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let served = consulta_gateway::start_server(&server_config, state, shutdown_signal()).await;

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "store shutdown failed");
    }
    served?;

    info!("consulta serve shutdown complete");
    Ok(())
}

/// Resolves on the first Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!(error = %e, "failed to listen for ctrl-c; shutting down"),
    }
}

/// Logs event throughput on the bus at debug level.
fn spawn_event_monitor(bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => debug!(
                    kind = %event.kind,
                    appointment_id = %event.appointment_id,
                    "bus delivered event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event monitor lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("consulta={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
