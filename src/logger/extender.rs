//! Field extenders: request-derived contributions to log metadata.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::logger::request::RequestInfo;
use crate::logger::Fields;

type ExtenderFn = dyn Fn(&RequestInfo) -> Value + Send + Sync;

/// One entry of the shared extender chain.
///
/// Either a closure producing a JSON object of fields from the request, or
/// a single property name that reads that one field off the request.
#[derive(Clone)]
pub enum Extender {
    Fn(Arc<ExtenderFn>),
    Property(String),
}

impl Extender {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&RequestInfo) -> Value + Send + Sync + 'static,
    {
        Extender::Fn(Arc::new(f))
    }

    /// Fields this extender contributes for the given request.
    ///
    /// A closure that panics, or that returns anything but an object,
    /// contributes nothing; a property absent from the request contributes
    /// nothing. The caller never observes a failure.
    pub(crate) fn apply(&self, request: &RequestInfo) -> Option<Fields> {
        match self {
            Extender::Property(key) => request.field(key).map(|value| {
                let mut fields = Fields::new();
                fields.insert(key.clone(), value);
                fields
            }),
            Extender::Fn(f) => {
                let value = catch_unwind(AssertUnwindSafe(|| f(request))).ok()?;
                match value {
                    Value::Object(fields) => Some(fields),
                    _ => None,
                }
            }
        }
    }
}

impl From<&str> for Extender {
    fn from(property: &str) -> Self {
        Extender::Property(property.to_string())
    }
}

impl From<String> for Extender {
    fn from(property: String) -> Self {
        Extender::Property(property)
    }
}

impl fmt::Debug for Extender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extender::Fn(_) => f.write_str("Extender::Fn"),
            Extender::Property(key) => write!(f, "Extender::Property({key})"),
        }
    }
}
