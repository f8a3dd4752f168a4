//! Error types for fallible setup paths.
//!
//! Runtime logging never returns errors: a disabled level is signalled by
//! `level()` returning `None`, and extender failures contribute no fields.
//! Only process-startup wiring can fail.

use thiserror::Error;

/// Errors raised while wiring up the logging or metrics backends.
#[derive(Debug, Error)]
pub enum Error {
    /// A global tracing subscriber was already installed.
    #[error("failed to initialize logging subscriber")]
    LoggingInit(#[from] tracing_subscriber::util::TryInitError),

    /// The configured metrics listen address did not parse.
    #[error("invalid metrics listen address: {0}")]
    InvalidMetricsAddress(String),

    /// The Prometheus exporter could not be installed.
    #[error("failed to install metrics exporter")]
    MetricsInit(#[from] metrics_exporter_prometheus::BuildError),
}
