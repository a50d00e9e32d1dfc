//! End-to-end tests for the tracking pipeline.
//!
//! POST /track → identity resolution → spawned recording pipeline → store.
//! The row store and geolocation are mocked; everything else is the
//! production code path, middleware included.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

#[tokio::test]
async fn track_records_a_view_and_echoes_identity() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body("/programme"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    // Fresh visit: every slot is minted and echoed back.
    let identity = &body["identity"];
    assert!(identity["visitor_id"].is_string());
    assert!(identity["session_id"].is_string());
    assert!(identity["session_started_at"].is_string());
    assert!(identity["last_activity_at"].is_string());

    ctx.wait_for_events(1).await;

    let events = ctx.store.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].page, "/programme");
    assert_eq!(events[0].view_count, 1);
    assert_eq!(
        events[0].session_id.to_string(),
        identity["session_id"].as_str().unwrap()
    );

    let sessions = ctx.store.sessions.lock();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id, events[0].session_id);
}

#[tokio::test]
async fn returned_slots_keep_the_session_across_views() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let first: Value = server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body("/"))
        .await
        .json();

    let second: Value = server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body_with_identity(
            "/programme",
            &first["identity"],
        ))
        .await
        .json();

    assert_eq!(first["identity"]["visitor_id"], second["identity"]["visitor_id"]);
    assert_eq!(first["identity"]["session_id"], second["identity"]["session_id"]);
    assert_eq!(
        first["identity"]["session_started_at"],
        second["identity"]["session_started_at"]
    );

    ctx.wait_for_events(2).await;
    // Insert-or-ignore: one session row for the two views.
    assert_eq!(ctx.store.sessions.lock().len(), 1);
}

#[tokio::test]
async fn bot_views_are_accepted_but_never_stored() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/track")
        .add_header("User-Agent", fixtures::bot_user_agent())
        .json(&fixtures::track_body("/programme"))
        .await;

    // The bot still gets a normal response; the discard is silent.
    response.assert_status_ok();

    ctx.settle().await;
    assert!(ctx.store.events.lock().is_empty());
    assert!(ctx.store.sessions.lock().is_empty());
}

#[tokio::test]
async fn geolocation_miss_records_the_view_without_a_location() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body("/programme"))
        .await
        .assert_status_ok();

    ctx.wait_for_events(1).await;

    let events = ctx.store.events.lock();
    assert!(events[0].country.is_none());
    assert!(events[0].latitude.is_none());
    assert!(events[0].longitude.is_none());
}

#[tokio::test]
async fn resolved_location_is_attached_to_the_event() {
    let ctx = TestContext::with_location(Some(fixtures::toulouse()));
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/track")
        .add_header("User-Agent", fixtures::mobile_user_agent())
        .json(&fixtures::track_body("/billetterie"))
        .await
        .assert_status_ok();

    ctx.wait_for_events(1).await;

    let events = ctx.store.events.lock();
    assert_eq!(events[0].city.as_deref(), Some("Toulouse"));
    assert_eq!(events[0].latitude, Some(43.6));
}

#[tokio::test]
async fn store_failure_does_not_fail_the_request() {
    let ctx = TestContext::new();
    ctx.store.fail_writes();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body("/programme"))
        .await;

    response.assert_status_ok();

    ctx.settle().await;
    assert!(ctx.store.events.lock().is_empty());
}

#[tokio::test]
async fn empty_page_is_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/track")
        .add_header("User-Agent", fixtures::desktop_user_agent())
        .json(&fixtures::track_body(""))
        .await;

    response.assert_status_bad_request();

    ctx.settle().await;
    assert!(ctx.store.events.lock().is_empty());
}
