//! Statistics collector boundary.
//!
//! # Responsibilities
//! - Define the [`StatsCollector`] contract fed one summary per finished
//!   request
//! - Provide the bundled `metrics`-crate collector and a discarding default
//!
//! # Design Decisions
//! - Collectors receive the summary after extender merging, so extender
//!   fields reach the stats path even with every log level disabled
//! - Recording must never fail the request; the trait is infallible

use crate::logger::Fields;

pub mod metrics;

pub use self::metrics::{init_metrics, MetricsCollector};

/// Receives the extended request summary, exactly once per finalized
/// request that passed through the lifecycle hook.
pub trait StatsCollector: Send + Sync {
    fn record(&self, summary: &Fields);
}

/// Discards every summary; the default when stats are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCollector;

impl StatsCollector for NullCollector {
    fn record(&self, _summary: &Fields) {}
}
