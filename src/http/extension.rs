//! The logger surface installed on each request.

use std::sync::Arc;

use axum::http::Request;
use serde_json::Value;

use crate::logger::{RequestInfo, RequestLogger};

/// Request extension holding the root logger.
///
/// Inserted by the lifecycle middleware; one per request. The root logger
/// itself stays private, handlers derive named children from it.
#[derive(Clone)]
pub struct RequestLog {
    root: RequestLogger,
}

impl RequestLog {
    pub(crate) fn new(root: RequestLogger) -> Self {
        Self { root }
    }

    /// Derive a named logger for this request. Every call returns a fresh
    /// instance; same-name calls are not memoized.
    pub fn logger(&self, name: impl Into<String>) -> RequestLogger {
        self.root.named(name)
    }

    /// Attach a request-scoped field, visible to property extenders on
    /// every subsequent log line and on the final summary.
    pub fn set_field(&self, key: impl Into<String>, value: Value) {
        if let Some(request) = self.root.request() {
            request.set_field(key, value);
        }
    }

    pub fn request(&self) -> Option<&Arc<RequestInfo>> {
        self.root.request()
    }
}

/// Named-logger access straight off the request object.
pub trait RequestLogExt {
    /// Derive a named logger for this request, or a detached no-op logger
    /// when the lifecycle middleware never ran. Never fails the request.
    fn request_log(&self, name: &str) -> RequestLogger;
}

impl<B> RequestLogExt for Request<B> {
    fn request_log(&self, name: &str) -> RequestLogger {
        match self.extensions().get::<RequestLog>() {
            Some(log) => log.logger(name),
            None => RequestLogger::detached().named(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogRegistry;
    use crate::sink::MemorySink;
    use axum::body::Body;
    use serde_json::json;

    #[test]
    fn missing_extension_degrades_to_noop() {
        let request = Request::builder().uri("/foo").body(Body::empty()).unwrap();
        let log = request.request_log("orphan");
        assert!(log.info().is_none());
        assert_eq!(log.name(), Some("orphan"));
    }

    #[test]
    fn installed_extension_derives_live_loggers() {
        let sink = Arc::new(MemorySink::new());
        let registry = LogRegistry::new(sink.clone());
        let root = registry.request_logger(Arc::new(RequestInfo::new("GET", "/foo")));

        let mut request = Request::builder().uri("/foo").body(Body::empty()).unwrap();
        request.extensions_mut().insert(RequestLog::new(root));

        let log = request.request_log("handler");
        log.info().unwrap().log("hello");

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].meta.get("name"), Some(&json!("handler")));
    }

    #[test]
    fn set_field_reaches_property_extenders() {
        let sink = Arc::new(MemorySink::new());
        let registry = LogRegistry::new(sink.clone());
        registry.add("user_id");
        let root = registry.request_logger(Arc::new(RequestInfo::new("GET", "/foo")));
        let log = RequestLog::new(root);

        log.set_field("user_id", json!("u-1"));
        log.logger("auth").info().unwrap().log("authenticated");

        assert_eq!(sink.records()[0].meta.get("user_id"), Some(&json!("u-1")));
    }
}
