//! Request-scoped logger core.
//!
//! # Data Flow
//! ```text
//! Sink (level set) ──change──▶ LogRegistry (level snapshot, extender chain)
//!                                   │
//!                      request_logger(RequestInfo)
//!                                   ▼
//!                             RequestLogger ──named(n)──▶ RequestLogger
//!                                   │
//!                        level(l) → LevelLogger.log_with(msg, meta)
//!                                   │ extend: fold extenders, name override
//!                                   ▼
//!                             Sink::log(level, msg, merged)
//! ```
//!
//! # Design Decisions
//! - One registry per process; every request logger holds an `Arc` to it,
//!   so extenders and level changes apply to all loggers at once
//! - The callable level set is a copy-on-write snapshot rebuilt on each
//!   sink notification; loggers query it per lookup, never cache it

pub mod extender;
pub mod registry;
pub mod request;
pub mod summary;

pub use extender::Extender;
pub use registry::LogRegistry;
pub use request::{LevelLogger, RequestInfo, RequestLogger};
pub use summary::{epoch_millis, RequestSummary};

/// Metadata mapping attached to every log line and request summary.
pub type Fields = serde_json::Map<String, serde_json::Value>;
