//! Configuration schema for the request logging subsystem.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Settings for the logging backend, the sink's enabled level set, and the
/// bundled metrics exporter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive for the tracing backend (e.g. "info",
    /// "request_log=debug"). Overridden by `RUST_LOG` when set.
    pub level: String,

    /// Level names the sink starts with enabled.
    pub levels: Vec<String>,

    /// Capture request headers into log lines and summaries.
    pub capture_headers: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            levels: vec![
                "debug".to_string(),
                "info".to_string(),
                "warn".to_string(),
                "error".to_string(),
            ],
            capture_headers: true,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
