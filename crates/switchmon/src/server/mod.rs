//! HTTP surface.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/devices` | Refresh, then list devices as JSON (stale on refresh failure) |
//! | GET | `/status` | One text line per sensor reading |
//! | GET | `/metrics` | Prometheus exposition of the sensor gauges |
//! | GET | `/healthz` | Liveness and directory age |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use switchmon_core::metrics::MetricsError;
use switchmon_core::{Controller, ExpositionOptions, MeterRegistry};

/// Shared state for the handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Controller,
    pub registry: Arc<MeterRegistry>,
    pub exposition: Arc<ExpositionOptions>,
}

impl AppState {
    /// Register the sensor gauges for `controller`.
    pub fn new(controller: Controller, exposition: ExpositionOptions) -> Result<Self, MetricsError> {
        let mut registry = MeterRegistry::new();
        controller.register_metrics(&mut registry)?;
        Ok(Self {
            controller,
            registry: Arc::new(registry),
            exposition: Arc::new(exposition),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/devices", get(handlers::devices))
        .route("/status", get(handlers::status))
        .route("/metrics", get(handlers::metrics))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then drain open connections.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
