//! Tests for the health endpoints.
//!
//! The health registry is process-global and these tests mutate it, so
//! they serialize on a lock instead of assuming a fresh registry.

use std::sync::Mutex;

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::setup::TestContext;
use serde_json::Value;
use telemetry::health;

static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

fn registry_guard() -> std::sync::MutexGuard<'static, ()> {
    REGISTRY_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[tokio::test]
async fn live_probe_always_succeeds() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn ready_probe_follows_store_health() {
    let _guard = registry_guard();
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    health().store.set_unhealthy("test: store down");
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    health().store.set_healthy();
    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn health_report_includes_components_and_metrics() {
    let _guard = registry_guard();
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    health().store.set_healthy();
    health().geo.set_healthy();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store_connected"], true);
    assert_eq!(body["geo_connected"], true);
    assert!(body["metrics"]["track_requests"].is_number());
    assert!(body["metrics"]["page_views_recorded"].is_number());
}

#[tokio::test]
async fn unhealthy_geo_degrades_the_report_but_not_readiness() {
    let _guard = registry_guard();
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    health().store.set_healthy();
    health().geo.set_unhealthy("test: providers down");

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["geo_connected"], false);

    // Geolocation is best-effort: tracking stays available.
    server.get("/health/ready").await.assert_status_ok();

    health().geo.set_healthy();
}
