//! End-to-end lifecycle tests: middleware, derived loggers, extenders,
//! level changes, and stats emission through a real axum router.

use std::sync::Arc;

use axum::{body::Body, http::Request};
use request_log::MemorySink;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::{test_app, RecordingStats};

fn get_foo() -> Request<Body> {
    Request::builder().uri("/foo").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn begin_and_end_lines_bracket_the_request() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, _registry) = test_app(sink.clone(), stats.clone());

    let response = app.oneshot(get_foo()).await.unwrap();
    assert_eq!(response.status(), 200);

    let records = sink.records();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0].level, "debug");
    assert_eq!(records[0].message, "request begin");
    let begin_request = records[0].meta.get("request").unwrap();
    assert_eq!(begin_request.get("method"), Some(&json!("GET")));
    assert_eq!(begin_request.get("url"), Some(&json!("/foo")));
    assert!(begin_request.get("begin").and_then(Value::as_u64).is_some());
    assert!(begin_request.get("statusCode").is_none());

    assert_eq!(records[1].message, "handling /foo");
    assert_eq!(records[1].meta.get("name"), Some(&json!("handler")));

    assert_eq!(records[2].level, "info");
    assert_eq!(records[2].message, "request end");
    let end_request = records[2].meta.get("request").unwrap();
    assert_eq!(end_request.get("statusCode"), Some(&json!(200)));
    let begin = end_request.get("begin").and_then(Value::as_u64).unwrap();
    let end = end_request.get("end").and_then(Value::as_u64).unwrap();
    let duration = end_request.get("duration").and_then(Value::as_u64).unwrap();
    assert!(end >= begin);
    assert_eq!(duration, end - begin);
}

#[tokio::test]
async fn one_stats_record_per_request_with_extender_fields() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, registry) = test_app(sink, stats.clone());

    // Registered before the request: a handler-attached property and the
    // middleware-minted request id.
    registry.add("user_id");
    registry.add("request_id");

    let response = app.oneshot(get_foo()).await.unwrap();
    assert_eq!(response.status(), 200);

    let summaries = stats.summaries();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.get("method"), Some(&json!("GET")));
    assert_eq!(summary.get("url"), Some(&json!("/foo")));
    assert_eq!(summary.get("statusCode"), Some(&json!(200)));
    assert_eq!(summary.get("user_id"), Some(&json!("u-42")));
    assert!(summary.get("request_id").and_then(Value::as_str).is_some());
    assert!(summary.get("duration").and_then(Value::as_u64).is_some());
}

#[tokio::test]
async fn inbound_request_id_is_reused() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, registry) = test_app(sink, stats.clone());
    registry.add("request_id");

    let request = Request::builder()
        .uri("/foo")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap();

    let summaries = stats.summaries();
    assert_eq!(summaries[0].get("request_id"), Some(&json!("req-abc")));
}

#[tokio::test]
async fn headers_are_captured_into_the_summary() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, _registry) = test_app(sink, stats.clone());

    let request = Request::builder()
        .uri("/foo")
        .header("user-agent", "lifecycle-test")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap();

    let summary = &stats.summaries()[0];
    let headers = summary.get("headers").unwrap();
    assert_eq!(headers.get("user-agent"), Some(&json!("lifecycle-test")));
}

#[tokio::test]
async fn stats_still_fire_with_every_level_disabled() {
    let sink = Arc::new(MemorySink::new());
    sink.enable_only(&[]);
    let stats = RecordingStats::new();
    let (app, _registry) = test_app(sink.clone(), stats.clone());

    let response = app.oneshot(get_foo()).await.unwrap();
    assert_eq!(response.status(), 200);

    // log(name) never throws, nothing is emitted, stats still arrive.
    assert!(sink.records().is_empty());
    assert_eq!(stats.summaries().len(), 1);
    assert_eq!(stats.summaries()[0].get("statusCode"), Some(&json!(200)));
}

#[tokio::test]
async fn level_changes_apply_between_requests() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, _registry) = test_app(sink.clone(), stats);

    sink.set_enabled("debug", false);
    app.clone().oneshot(get_foo()).await.unwrap();
    assert!(sink
        .records()
        .iter()
        .all(|record| record.message != "request begin"));

    sink.set_enabled("debug", true);
    app.oneshot(get_foo()).await.unwrap();
    assert!(sink
        .records()
        .iter()
        .any(|record| record.message == "request begin"));
}

#[tokio::test]
async fn unmatched_route_still_gets_summarized() {
    let sink = Arc::new(MemorySink::new());
    let stats = RecordingStats::new();
    let (app, _registry) = test_app(sink, stats.clone());

    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 404);

    let summaries = stats.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].get("statusCode"), Some(&json!(404)));
}
