//! Per-request snapshot and the derivable request logger.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use axum::http::Request;
use serde_json::Value;

use crate::logger::registry::LogRegistry;
use crate::logger::Fields;

/// Request-derived data the logger core reads: method, url, headers,
/// trailers, plus a bag of fields handlers attach while the request is in
/// flight (auth identity, tenant, request id).
pub struct RequestInfo {
    method: String,
    url: String,
    headers: Fields,
    trailers: RwLock<Fields>,
    fields: RwLock<Fields>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Fields::new(),
            trailers: RwLock::new(Fields::new()),
            fields: RwLock::new(Fields::new()),
        }
    }

    /// Snapshot an inbound request. Repeated header names are joined with
    /// a comma, matching their on-the-wire meaning.
    pub fn from_request<B>(request: &Request<B>, capture_headers: bool) -> Self {
        let mut headers = Fields::new();
        if capture_headers {
            for (name, value) in request.headers() {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                match headers.get_mut(name.as_str()) {
                    Some(Value::String(existing)) => {
                        existing.push_str(", ");
                        existing.push_str(&value);
                    }
                    _ => {
                        headers.insert(name.as_str().to_string(), Value::String(value));
                    }
                }
            }
        }
        Self {
            method: request.method().to_string(),
            url: request.uri().to_string(),
            headers,
            trailers: RwLock::new(Fields::new()),
            fields: RwLock::new(Fields::new()),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Fields {
        &self.headers
    }

    /// Trailers arrive only after the body is consumed; they stay empty
    /// unless the host records them.
    pub fn trailers(&self) -> Fields {
        self.trailers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn record_trailers(&self, trailers: Fields) {
        *self
            .trailers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = trailers;
    }

    /// Attach a request-scoped field, readable by property extenders.
    pub fn set_field(&self, key: impl Into<String>, value: Value) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    /// Resolve one named field: `method` and `url` first, then the bag.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "method" => Some(Value::String(self.method.clone())),
            "url" => Some(Value::String(self.url.clone())),
            _ => self
                .fields
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(name)
                .cloned(),
        }
    }
}

impl fmt::Debug for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestInfo")
            .field("method", &self.method)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct LoggerInner {
    registry: Arc<LogRegistry>,
    request: Arc<RequestInfo>,
}

/// A logger bound to one request.
///
/// Derivation via [`named`](RequestLogger::named) clones the registry and
/// request handles and sets a new `name`; everything else stays shared, so
/// extenders added after derivation and level changes apply to every
/// derived logger at once. A *detached* logger (no registry) is the no-op
/// degradation used when the middleware never ran: every level lookup
/// returns `None` and `extend` is the identity.
#[derive(Clone)]
pub struct RequestLogger {
    inner: Option<LoggerInner>,
    name: Option<String>,
}

impl RequestLogger {
    pub(crate) fn root(registry: Arc<LogRegistry>, request: Arc<RequestInfo>) -> Self {
        Self {
            inner: Some(LoggerInner { registry, request }),
            name: None,
        }
    }

    /// A logger with no backing registry; all operations are no-ops.
    pub fn detached() -> Self {
        Self {
            inner: None,
            name: None,
        }
    }

    /// Derive an independent logger carrying `name`.
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            inner: self.inner.clone(),
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn request(&self) -> Option<&Arc<RequestInfo>> {
        self.inner.as_ref().map(|inner| &inner.request)
    }

    /// The call surface for one level, or `None` while that level is
    /// disabled or unknown. Absence is the "level disabled" signal; there
    /// is no callable surface to guard against.
    pub fn level(&self, name: &str) -> Option<LevelLogger<'_>> {
        let inner = self.inner.as_ref()?;
        if !inner.registry.level_enabled(name) {
            return None;
        }
        Some(LevelLogger {
            logger: self,
            level: name.to_string(),
        })
    }

    pub fn trace(&self) -> Option<LevelLogger<'_>> {
        self.level("trace")
    }

    pub fn debug(&self) -> Option<LevelLogger<'_>> {
        self.level("debug")
    }

    pub fn info(&self) -> Option<LevelLogger<'_>> {
        self.level("info")
    }

    pub fn warn(&self) -> Option<LevelLogger<'_>> {
        self.level("warn")
    }

    pub fn error(&self) -> Option<LevelLogger<'_>> {
        self.level("error")
    }

    /// Run `meta` through the shared extender chain against this logger's
    /// request. Identity for a detached logger.
    pub fn extend(&self, meta: Fields) -> Fields {
        match &self.inner {
            Some(inner) => inner.registry.apply_extenders(&inner.request, meta),
            None => meta,
        }
    }

    fn emit(&self, level: &str, message: &str, meta: Fields) {
        let inner = match &self.inner {
            Some(inner) => inner,
            None => return,
        };
        let mut meta = self.extend(meta);
        // The logger's own name always wins over extender-supplied ones;
        // an unnamed logger suppresses the key entirely.
        match &self.name {
            Some(name) => {
                meta.insert("name".to_string(), Value::String(name.clone()));
            }
            None => {
                meta.remove("name");
            }
        }
        inner.registry.sink().log(level, message, &meta);
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("name", &self.name)
            .field("detached", &self.inner.is_none())
            .finish()
    }
}

/// One level's call surface, resolved against the live level snapshot.
pub struct LevelLogger<'a> {
    logger: &'a RequestLogger,
    level: String,
}

impl LevelLogger<'_> {
    /// Log with empty metadata.
    pub fn log(&self, message: impl fmt::Display) {
        self.log_with(message, Fields::new());
    }

    /// Log with explicit metadata. The message is stringified, the metadata
    /// runs through the extender chain, and the result goes to the sink.
    pub fn log_with(&self, message: impl fmt::Display, meta: Fields) {
        self.logger.emit(&self.level, &message.to_string(), meta);
    }
}
