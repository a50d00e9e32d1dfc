//! Tests for the dashboard statistics endpoint.

use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

#[tokio::test]
async fn stats_aggregates_the_requested_window() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let day_one = Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap();
    let day_two = Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap();
    ctx.store.seed_events(vec![
        fixtures::page_view("/programme", day_one),
        fixtures::page_view("/programme", day_one + chrono::Duration::hours(4)),
        fixtures::page_view("/accueil", day_two),
    ]);

    let response = server
        .get("/stats")
        .add_query_param("from", "2026-06-01T00:00:00Z")
        .add_query_param("to", "2026-06-03T00:00:00Z")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["total_visits"], 3);
    // First-occurrence order for the page series.
    assert_eq!(body["page_series"][0]["label"], "Programme");
    assert_eq!(body["page_series"][0]["value"], 2);
    assert_eq!(body["page_series"][1]["label"], "Accueil");
    // Chronological daily series.
    assert_eq!(body["daily_series"][0]["label"], "01/06");
    assert_eq!(body["daily_series"][1]["label"], "02/06");
    // Mobile/desktop split covers every visit.
    assert_eq!(body["device_series"][0]["label"], "Mobile");
    assert_eq!(body["device_series"][0]["value"], 0);
    assert_eq!(body["device_series"][1]["value"], 3);
}

#[tokio::test]
async fn events_outside_the_window_are_excluded() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    ctx.store.seed_events(vec![
        fixtures::page_view("/a", Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()),
        // Exactly at the end bound: excluded.
        fixtures::page_view("/a", Utc.with_ymd_and_hms(2026, 6, 2, 0, 0, 0).unwrap()),
    ]);

    let body: Value = server
        .get("/stats")
        .add_query_param("from", "2026-06-01T00:00:00Z")
        .add_query_param("to", "2026-06-02T00:00:00Z")
        .await
        .json();

    assert_eq!(body["total_visits"], 1);
}

#[tokio::test]
async fn empty_store_yields_a_zeroed_dashboard() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/stats").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_visits"], 0);
    assert_eq!(body["average_session_duration_secs"], 0.0);
    assert!(body["page_series"].as_array().unwrap().is_empty());
    assert!(body["markers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .get("/stats")
        .add_query_param("from", "2026-06-03T00:00:00Z")
        .add_query_param("to", "2026-06-01T00:00:00Z")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn peak_hours_are_limited_and_descending() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut events = Vec::new();
    for hour in 0..8u32 {
        // hour h gets h+1 views, so hour 7 is the peak.
        for _ in 0..=hour {
            events.push(fixtures::page_view(
                "/programme",
                Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap(),
            ));
        }
    }
    ctx.store.seed_events(events);

    let body: Value = server
        .get("/stats")
        .add_query_param("from", "2026-06-01T00:00:00Z")
        .add_query_param("to", "2026-06-02T00:00:00Z")
        .await
        .json();

    let peaks = body["peak_hours"].as_array().unwrap();
    assert_eq!(peaks.len(), 5);
    assert_eq!(peaks[0]["label"], "07h");
    assert_eq!(peaks[0]["value"], 8);
    assert_eq!(peaks[4]["label"], "03h");
}
