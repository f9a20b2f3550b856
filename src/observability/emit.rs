//! Emission function plumbing shared by every strategy.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{Method, Request};
use percent_encoding::percent_decode_str;

use crate::http::X_REQUEST_ID;
use crate::observability::json::json_stdio;

/// Status recorded when the handler never finalized the response.
///
/// Strategies print it as-is (`0`); it means "unknown", not a real code.
pub const STATUS_UNSET: u16 = 0;

/// Read-only view of the inbound request handed to emission functions.
#[derive(Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    /// Value of the `x-request-id` header, if the request carried one.
    pub request_id: Option<String>,
    /// Span that was current when the request entered the middleware.
    pub span: tracing::Span,
}

impl RequestInfo {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            request_id: None,
            span: tracing::Span::none(),
        }
    }

    /// Capture the descriptor of `req` in the current span.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let request_id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            method: req.method().clone(),
            path: decoded_path(req.uri().path()),
            request_id,
            span: tracing::Span::current(),
        }
    }
}

/// Percent-decoded form of `raw`, or `raw` itself when the bytes are not UTF-8.
fn decoded_path(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|path| path.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl fmt::Debug for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestInfo")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("request_id", &self.request_id)
            .finish()
    }
}

/// An emission strategy: turns (request, elapsed, status) into a log side effect.
///
/// Implementations are shared by concurrent requests and must be safe to
/// call from several threads at once.
pub type LogFn = Arc<dyn Fn(&RequestInfo, Duration, u16) + Send + Sync>;

/// Box a closure as a [`LogFn`].
pub fn log_fn<F>(f: F) -> LogFn
where
    F: Fn(&RequestInfo, Duration, u16) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Invoke every function, in order, for each request.
pub fn fan_out(log_fns: Vec<LogFn>) -> LogFn {
    let log_fns: Arc<[LogFn]> = log_fns.into();
    log_fn(move |req, elapsed, status| {
        for emit in log_fns.iter() {
            emit(req, elapsed, status);
        }
    })
}

/// Pick the emission function for a wrapped handler.
///
/// None supplied falls back to JSON lines on stdout/stderr, one is used
/// directly, several are fanned out in the given order.
pub fn select(mut log_fns: Vec<LogFn>) -> LogFn {
    match log_fns.len() {
        0 => json_stdio(),
        1 => log_fns.remove(0),
        _ => fan_out(log_fns),
    }
}
