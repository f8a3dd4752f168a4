//! Lifecycle middleware: one invocation per inbound request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use uuid::Uuid;

use crate::http::extension::RequestLog;
use crate::logger::{
    epoch_millis, Fields, LogRegistry, RequestInfo, RequestLogger, RequestSummary,
};
use crate::stats::StatsCollector;

/// State for the lifecycle middleware, shared across requests.
#[derive(Clone)]
pub struct RequestLogState {
    pub registry: Arc<LogRegistry>,
    pub stats: Arc<dyn StatsCollector>,
    pub capture_headers: bool,
}

impl RequestLogState {
    pub fn new(registry: Arc<LogRegistry>, stats: Arc<dyn StatsCollector>) -> Self {
        Self {
            registry,
            stats,
            capture_headers: true,
        }
    }

    pub fn capture_headers(mut self, capture: bool) -> Self {
        self.capture_headers = capture;
        self
    }
}

/// One-shot end-of-request emission.
///
/// The first `finish` logs the "request end" line, runs the summary
/// through the extender chain, and forwards it to the stats collector;
/// every later call is a no-op. The begin/end pair is tied together by the
/// `begin` timestamp captured at construction.
pub struct RequestCompletion {
    logger: RequestLogger,
    stats: Arc<dyn StatsCollector>,
    request: Arc<RequestInfo>,
    begin: u64,
    fired: AtomicBool,
}

impl RequestCompletion {
    pub fn new(
        logger: RequestLogger,
        stats: Arc<dyn StatsCollector>,
        request: Arc<RequestInfo>,
        begin: u64,
    ) -> Self {
        Self {
            logger,
            stats,
            request,
            begin,
            fired: AtomicBool::new(false),
        }
    }

    pub fn finish(&self, status_code: u16) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        let end = epoch_millis();
        let summary = RequestSummary::complete(&self.request, self.begin, end, status_code);

        if let Some(info) = self.logger.info() {
            let mut meta = Fields::new();
            meta.insert("request".to_string(), summary.to_value());
            info.log_with("request end", meta);
        }

        // Stats emission is independent of level state; the summary still
        // picks up extender fields.
        let extended = self.logger.extend(summary.to_fields());
        self.stats.record(&extended);
    }
}

/// Attach the per-request logger, log begin/end, and feed the stats
/// collector. Logging never alters the response or fails the request.
pub async fn request_log(
    State(state): State<RequestLogState>,
    mut request: Request,
    next: Next,
) -> Response {
    let info = Arc::new(RequestInfo::from_request(&request, state.capture_headers));
    info.set_field("request_id", Value::String(request_id(&request)));

    let root = state.registry.request_logger(info.clone());
    request
        .extensions_mut()
        .insert(RequestLog::new(root.clone()));

    let log = root.named(module_path!());
    let begin = epoch_millis();
    if let Some(debug) = log.debug() {
        let mut meta = Fields::new();
        meta.insert(
            "request".to_string(),
            RequestSummary::begin(&info, begin).to_value(),
        );
        debug.log_with("request begin", meta);
    }

    let completion = RequestCompletion::new(log, state.stats.clone(), info, begin);
    let response = next.run(request).await;
    completion.finish(response.status().as_u16());
    response
}

/// Reuse the inbound `x-request-id` when present, mint a UUID otherwise.
fn request_id(request: &Request) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
