use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, warn};

use switchmon_core::metrics::{CONTENT_TYPE as PROMETHEUS_CONTENT_TYPE, render_prometheus};

use super::AppState;
use crate::output;

/// Set when `/devices` served the cached directory because refresh failed.
pub const STALE_HEADER: &str = "x-switchmon-stale";
/// Number of sensor devices that produced no reading.
pub const FAILED_DEVICES_HEADER: &str = "x-switchmon-failed-devices";

// ── Devices ────────────────────────────────────────────────────

/// GET /devices
pub async fn devices(State(state): State<AppState>) -> Response {
    let stale = match state.controller.refresh_devices().await {
        Ok(_) => false,
        Err(e) => {
            warn!(error = %e, "device refresh failed, serving cached directory");
            true
        }
    };

    let devices = state.controller.devices_snapshot();
    let body = match output::device_listing_json(&devices) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to encode device listing");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut resp = ([(header::CONTENT_TYPE, "application/json")], body).into_response();
    if stale {
        resp.headers_mut()
            .insert(STALE_HEADER, HeaderValue::from_static("true"));
    }
    resp
}

// ── Status ─────────────────────────────────────────────────────

/// GET /status
pub async fn status(State(state): State<AppState>) -> Response {
    let ctx = state.controller.fetch_context();
    let report = state.controller.sensor_readings(&ctx).await;
    debug!(
        readings = report.readings.len(),
        failures = report.errors.len(),
        "status sweep"
    );

    let mut resp = (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output::status_lines(&report),
    )
        .into_response();
    if !report.errors.is_empty() {
        resp.headers_mut()
            .insert(FAILED_DEVICES_HEADER, HeaderValue::from(report.errors.len()));
    }
    resp
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let ctx = state.controller.fetch_context();
    let scrape = state.registry.collect(&ctx).await;
    let body = render_prometheus(&scrape, &state.exposition);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        body,
    )
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let directory = state.controller.directory();
    Json(json!({
        "status": "ok",
        "devices": directory.device_count(),
        "lastRefresh": directory.last_refresh().map(|t| t.to_rfc3339()),
        "ageSecs": directory.data_age().map(|age| age.num_seconds().max(0)),
    }))
}
