//! The ephemeral begin/end record built for logging and stats emission.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

use crate::logger::request::RequestInfo;
use crate::logger::Fields;

/// Milliseconds since the Unix epoch.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Snapshot of one request's lifecycle, serialized with the wire-facing
/// camelCase keys. Built twice: partial at begin, complete at end. Never
/// persisted; it exists to be merged and forwarded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    pub headers: Fields,
    pub trailers: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub begin: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl RequestSummary {
    /// The begin-time record: no status, end, or duration yet.
    pub fn begin(request: &RequestInfo, begin: u64) -> Self {
        Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            trailers: request.trailers(),
            status_code: None,
            begin,
            end: None,
            duration: None,
        }
    }

    /// The end-time record. Duration saturates at zero; the wall clock is
    /// not monotonic.
    pub fn complete(request: &RequestInfo, begin: u64, end: u64, status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            end: Some(end),
            duration: Some(end.saturating_sub(begin)),
            ..Self::begin(request, begin)
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_fields())
    }

    pub fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Fields::new(),
        }
    }
}
