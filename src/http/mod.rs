//! HTTP lifecycle hook.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → middleware.rs (snapshot request, install RequestLog extension)
//!     → "request begin" debug line
//!     → next handler chain (handlers derive named loggers via the
//!       RequestLog extension / RequestLogExt)
//!     → response finalized (exactly once)
//!     → "request end" info line + extended summary to the stats collector
//! ```

pub mod extension;
pub mod middleware;

pub use extension::{RequestLog, RequestLogExt};
pub use middleware::{request_log, RequestCompletion, RequestLogState};
