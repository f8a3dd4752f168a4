//! Request-scoped structured logging middleware for axum services.
//!
//! The lifecycle middleware attaches a logger factory to every inbound
//! request; handlers derive named loggers whose lines are enriched by a
//! process-wide chain of field extenders; when the response finishes, one
//! timing summary goes to the stats collector.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use request_log::{
//!     request_log, LogConfig, LogRegistry, MetricsCollector, RequestLogExt,
//!     RequestLogState, TracingSink,
//! };
//!
//! # fn main() -> Result<(), request_log::Error> {
//! let config = LogConfig::default();
//! request_log::init_logging(&config)?;
//!
//! let registry = LogRegistry::new(Arc::new(TracingSink::from_config(&config)));
//! registry.add("request_id");
//!
//! let state = RequestLogState::new(registry, Arc::new(MetricsCollector));
//! let app: Router = Router::new()
//!     .route("/", get(|req: axum::extract::Request| async move {
//!         if let Some(info) = req.request_log("handler").info() {
//!             info.log("handling");
//!         }
//!         "ok"
//!     }))
//!     .layer(from_fn_with_state(state, request_log));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod sink;
pub mod stats;

pub use config::LogConfig;
pub use error::Error;
pub use http::{request_log, RequestCompletion, RequestLog, RequestLogExt, RequestLogState};
pub use logger::{
    Extender, Fields, LevelLogger, LogRegistry, RequestInfo, RequestLogger, RequestSummary,
};
pub use sink::{init_logging, LevelSpec, LogRecord, MemorySink, Sink, TracingSink};
pub use stats::{init_metrics, MetricsCollector, NullCollector, StatsCollector};
