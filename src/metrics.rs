//! Prometheus metrics.
//!
//! Counters are emitted with the `metrics` facade from wherever the event
//! happens; this module installs the Prometheus recorder at startup and
//! renders the scrape body for `GET /metrics`.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metric names.
pub mod names {
    pub const REDIRECT_CACHE_HITS_TOTAL: &str = "redirect_cache_hits_total";
    pub const REDIRECT_CACHE_MISSES_TOTAL: &str = "redirect_cache_misses_total";
    pub const REDIRECT_CACHE_ERRORS_TOTAL: &str = "redirect_cache_errors_total";
    pub const REDIRECT_NOT_FOUND_TOTAL: &str = "redirect_not_found_total";

    pub const CLICK_EVENTS_DROPPED_TOTAL: &str = "click_events_dropped_total";
    pub const CLICK_EVENTS_FAILED_TOTAL: &str = "click_events_failed_total";
}

/// Installs the global Prometheus recorder.
///
/// Returns `false` if a recorder was already installed, either by an earlier
/// call or by someone else.
pub fn init_metrics() -> bool {
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }

            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Renders all metrics in Prometheus text format, `None` before [`init_metrics`].
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|handle| handle.render())
}

/// `GET /metrics`
///
/// 503 when the recorder is not installed.
pub async fn metrics_handler() -> Response {
    match render_metrics() {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}
