//! `POST /api/log-error` end to end over an in-memory fallback store.

mod common;

use serde_json::json;

use common::{json, MemoryFallbackStore, TestApp};

fn event(critical: bool) -> serde_json::Value {
    json!({
        "severity": "error",
        "route": "/productos/cemento",
        "action": "add_to_quote",
        "message": "TypeError: cannot read properties of undefined (user ana@example.com)",
        "critical": critical,
        "sessionId": "sess-42"
    })
}

#[tokio::test]
async fn test_invalid_event_lists_fields() {
    let app = TestApp::new("production");
    let (status, body) = app
        .send(json(
            "POST",
            "/api/log-error",
            None,
            json!({ "message": "", "route": "r".repeat(201) }),
        ))
        .await;

    assert_eq!(status, 400);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["message", "route"]);
    assert_eq!(app.store.row_count(), 0);
}

#[tokio::test]
async fn test_development_event_not_persisted() {
    let app = TestApp::new("development");
    let (status, body) = app
        .send(json("POST", "/api/log-error", None, event(false)))
        .await;

    assert_eq!(status, 202);
    assert_eq!(body["status"], "skipped");
    assert_eq!(body["reason"], "not_persisted");
    assert_eq!(app.store.row_count(), 0);
}

#[tokio::test]
async fn test_identical_events_share_a_row() {
    let app = TestApp::new("production");

    let (status, first) = app
        .send(json("POST", "/api/log-error", None, event(false)))
        .await;
    assert_eq!(status, 201);
    assert_eq!(first["status"], "stored");
    assert_eq!(first["occurrences"], 1);

    let (status, second) = app
        .send(json("POST", "/api/log-error", None, event(false)))
        .await;
    assert_eq!(status, 200);
    assert_eq!(second["occurrences"], 2);
    assert_eq!(second["fingerprint"], first["fingerprint"]);

    assert_eq!(app.store.row_count(), 1);
    assert_eq!(app.store.total_occurrences(), 2);
}

#[tokio::test]
async fn test_thirty_first_event_is_rate_limited() {
    let app = TestApp::new("development");

    for _ in 0..30 {
        let (status, _) = app
            .send(json("POST", "/api/log-error", None, event(true)))
            .await;
        assert!(status == 200 || status == 201);
    }
    let (status, body) = app
        .send(json("POST", "/api/log-error", None, event(true)))
        .await;

    assert_eq!(status, 202);
    assert_eq!(body["reason"], "rate_limited");
    assert_eq!(app.store.total_occurrences(), 30);
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = TestApp::with_store("production", MemoryFallbackStore::failing());
    let (status, body) = app
        .send(json("POST", "/api/log-error", None, event(true)))
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    // The ingest route's own failures are not fed back into the reporter
    assert_eq!(app.sink.wait_for(1).await, 0);
}
