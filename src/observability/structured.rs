//! Structured strategy: one `tracing` event per request.
//!
//! # Design Decisions
//! - Server errors (status >= 500) are a single ERROR event, message
//!   `request error`; everything else is `request` at the configured severity
//! - On the current dispatcher the event is recorded inside the span
//!   captured with the request, so subscribers correlate it with the rest
//!   of the request's events
//! - An explicit `Dispatch` sink never sees that span; `request_id` is the
//!   only correlation there

use std::time::Duration;

use tracing::{Dispatch, Level};

use crate::config::HttpLogConfig;
use crate::observability::emit::{log_fn, LogFn, RequestInfo};
use crate::observability::level::{resolve_level, Severity};

macro_rules! request_event {
    (@emit $lvl:expr, $req:expr, $elapsed:expr, $status:expr, $severity:expr, $msg:literal) => {
        tracing::event!(
            target: "httplog",
            $lvl,
            method = %$req.method,
            path = %$req.path,
            status = $status,
            duration = ?$elapsed,
            severity = %$severity,
            request_id = $req.request_id.as_deref(),
            $msg
        )
    };
    ($level:expr, $($args:tt)*) => {
        // tracing needs the level as a constant at each callsite
        match $level {
            Level::TRACE => request_event!(@emit Level::TRACE, $($args)*),
            Level::DEBUG => request_event!(@emit Level::DEBUG, $($args)*),
            Level::INFO => request_event!(@emit Level::INFO, $($args)*),
            Level::WARN => request_event!(@emit Level::WARN, $($args)*),
            _ => request_event!(@emit Level::ERROR, $($args)*),
        }
    };
}

fn record(req: &RequestInfo, elapsed: Duration, status: u16, level: Severity) {
    if status >= 500 {
        let severity = Severity::ERROR;
        request_event!(@emit Level::ERROR, req, elapsed, status, severity, "request error");
    } else {
        request_event!(level.tracing_level(), req, elapsed, status, level, "request");
    }
}

/// Structured strategy on whatever dispatcher is current at emission time.
///
/// The event is recorded inside the span captured with the request.
pub fn structured(level: Severity) -> LogFn {
    log_fn(move |req, elapsed, status| {
        req.span.in_scope(|| record(req, elapsed, status, level))
    })
}

/// Structured strategy writing into an explicit sink.
///
/// The request span belongs to the dispatcher that was current when the
/// request arrived, so events sent here are not nested in it. Correlate
/// them through the `request_id` field instead.
pub fn structured_to(dispatch: Dispatch, level: Severity) -> LogFn {
    log_fn(move |req, elapsed, status| {
        tracing::dispatcher::with_default(&dispatch, || record(req, elapsed, status, level))
    })
}

/// Structured strategy whose level comes from the configured environment
/// variable. Exits the process if the variable holds an invalid value.
pub fn structured_from_config(config: &HttpLogConfig) -> LogFn {
    structured(resolve_level(&config.level_env_var, config.default_level))
}
