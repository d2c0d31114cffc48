mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::{InMemoryCache, InMemoryLinkRepository};
use linkhop::api::handlers::health_handler;
use linkhop::state::AppState;
use serde_json::Value;
use std::sync::Arc;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let links = Arc::new(InMemoryLinkRepository::default());
    let cache = Arc::new(InMemoryCache::default());
    let (state, _rx) = common::create_test_state(links, cache, 16);
    let server = server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);

    let body: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_cache_down_is_degraded() {
    let links = Arc::new(InMemoryLinkRepository::default());
    let cache = Arc::new(InMemoryCache::failing());
    let (state, _rx) = common::create_test_state(links, cache, 16);
    let server = server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let body: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "error");
}

#[tokio::test]
async fn test_health_database_down_is_degraded() {
    let links = Arc::new(InMemoryLinkRepository::failing());
    let cache = Arc::new(InMemoryCache::default());
    let (state, _rx) = common::create_test_state(links, cache, 16);
    let server = server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_health_closed_click_queue_is_degraded() {
    let links = Arc::new(InMemoryLinkRepository::default());
    let cache = Arc::new(InMemoryCache::default());
    let (state, rx) = common::create_test_state(links, cache, 16);
    drop(rx);
    let server = server(state);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(body["checks"]["click_queue"]["status"], "error");
}
