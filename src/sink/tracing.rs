//! Production sink over the `tracing` crate.
//!
//! # Responsibilities
//! - Forward level-tagged messages as tracing events
//! - Initialize the tracing subscriber from config
//! - Expose the runtime-mutable enabled level set

use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;
use crate::error::Error;
use crate::logger::Fields;
use crate::sink::{LevelListener, LevelSpec, LevelState, Sink};

/// The level names this sink understands.
pub const TAXONOMY: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Sink emitting through the `tracing` macros, metadata serialized as one
/// JSON field per event.
pub struct TracingSink {
    state: LevelState,
}

impl TracingSink {
    /// Standard levels with trace disabled.
    pub fn new() -> Self {
        Self {
            state: LevelState::new(TAXONOMY.map(|name| (name, name != "trace"))),
        }
    }

    /// Enabled set taken from `config.levels`.
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            state: LevelState::new(
                TAXONOMY.map(|name| (name, config.levels.iter().any(|l| l == name))),
            ),
        }
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) {
        self.state.set_enabled(name, enabled);
    }

    pub fn enable_only(&self, names: &[&str]) {
        self.state.enable_only(names);
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TracingSink {
    fn log(&self, level: &str, message: &str, meta: &Fields) {
        let meta = Value::Object(meta.clone());
        match level {
            "trace" => tracing::trace!(target: "request_log", meta = %meta, "{}", message),
            "debug" => tracing::debug!(target: "request_log", meta = %meta, "{}", message),
            "info" => tracing::info!(target: "request_log", meta = %meta, "{}", message),
            "warn" => tracing::warn!(target: "request_log", meta = %meta, "{}", message),
            "error" => tracing::error!(target: "request_log", meta = %meta, "{}", message),
            _ => {}
        }
    }

    fn levels(&self) -> Vec<LevelSpec> {
        self.state.specs()
    }

    fn subscribe(&self, listener: LevelListener) {
        self.state.subscribe(listener);
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured directive when present. Errors if a
/// subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), Error> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
