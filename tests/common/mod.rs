//! Shared utilities for lifecycle integration tests.

use std::sync::{Arc, Mutex};

use axum::{middleware::from_fn_with_state, routing::get, Router};
use request_log::{
    request_log, Fields, LogRegistry, MemorySink, RequestLogExt, RequestLogState, StatsCollector,
};
use serde_json::json;

/// Stats collector that keeps every summary for assertions.
#[derive(Default)]
pub struct RecordingStats(Mutex<Vec<Fields>>);

impl RecordingStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn summaries(&self) -> Vec<Fields> {
        self.0.lock().unwrap().clone()
    }
}

impl StatsCollector for RecordingStats {
    fn record(&self, summary: &Fields) {
        self.0.lock().unwrap().push(summary.clone());
    }
}

/// An app with the lifecycle middleware installed and one handler at /foo
/// that derives a named logger and tags the request with a user id.
pub fn test_app(
    sink: Arc<MemorySink>,
    stats: Arc<RecordingStats>,
) -> (Router, Arc<LogRegistry>) {
    let registry = LogRegistry::new(sink);
    let state = RequestLogState::new(registry.clone(), stats);

    let app = Router::new()
        .route(
            "/foo",
            get(|request: axum::extract::Request| async move {
                if let Some(log) = request.extensions().get::<request_log::RequestLog>() {
                    log.set_field("user_id", json!("u-42"));
                }
                let log = request.request_log("handler");
                if let Some(info) = log.info() {
                    info.log("handling /foo");
                }
                "ok"
            }),
        )
        .layer(from_fn_with_state(state, request_log));

    (app, registry)
}
