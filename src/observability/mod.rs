//! Request log emission.
//!
//! # Data Flow
//! ```text
//! http::wrap / http::layer (one call per finished request)
//!     → emit.rs (selected LogFn: single strategy or fan-out)
//!     → json.rs (fixed JSON line on stdout, plus stderr for 5xx)
//!     → structured.rs (tracing event at the resolved severity)
//!
//! level.rs resolves the structured severity from the environment once,
//! when the strategy is built.
//! ```
//!
//! # Design Decisions
//! - Strategies are plain `Fn` values shared via `Arc`; no trait hierarchy
//! - Logging is best effort: strategies never return errors to the request path
//! - Log formatting and sinks belong to `tracing-subscriber` or the
//!   supplied writers, not to this crate

pub mod emit;
pub mod json;
pub mod level;
pub mod structured;

pub use emit::{fan_out, log_fn, select, LogFn, RequestInfo, STATUS_UNSET};
pub use json::{json, json_stdio};
pub use level::{resolve_level, try_resolve_level, LevelError, Severity, DEFAULT_LEVEL_ENV_VAR};
pub use structured::{structured, structured_from_config, structured_to};
