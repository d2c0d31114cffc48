//! Top-level router.
//!
//! # Route Structure
//!
//! - `GET /health`      - component health (public)
//! - `GET /metrics`     - Prometheus scrape endpoint
//! - `GET /{short_url}` - short link redirect (public)
//!
//! `/health` and `/metrics` are static segments and win over the capture
//! route, which is why both are reserved tokens.

use crate::api::handlers::{health_handler, redirect_handler};
use crate::metrics::metrics_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/{short_url}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
