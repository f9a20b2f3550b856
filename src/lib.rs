//! HTTP request logging middleware.
//!
//! Wraps a handler, times each request, captures the status code it sends
//! and emits one log record per request: a fixed JSON line on stdout
//! (stderr too for server errors) or a structured `tracing` event.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod test_util;

pub use config::HttpLogConfig;
pub use http::{wrap, HttpLogLayer, HttpServer, StatusRecorder};
pub use observability::{LogFn, RequestInfo, Severity};
