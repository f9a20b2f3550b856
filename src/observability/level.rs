//! Severity levels and their resolution from the environment.
//!
//! # Responsibilities
//! - Define an ordered severity that also admits raw integer levels
//! - Resolve the structured log level from an environment variable
//! - Treat an explicitly set but unparseable value as fatal
//!
//! # Design Decisions
//! - Levels are spaced four apart (DEBUG=-4, INFO=0, WARN=4, ERROR=8) so
//!   custom levels can sit between the named ones
//! - Named values match their canonical text exactly (`INFO`, not `info`)
//! - `try_resolve_level` returns the error; `resolve_level` is the
//!   startup-time variant that terminates the process

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable consulted when the caller passes an empty name.
pub const DEFAULT_LEVEL_ENV_VAR: &str = "HTTP_LOG_LEVEL";

/// Ordered logging severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(pub i64);

impl Severity {
    pub const DEBUG: Severity = Severity(-4);
    pub const INFO: Severity = Severity(0);
    pub const WARN: Severity = Severity(4);
    pub const ERROR: Severity = Severity(8);

    const NAMED: [Severity; 4] = [Self::DEBUG, Self::INFO, Self::WARN, Self::ERROR];

    /// Raw integer value of this level.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Tracing level this severity is emitted at.
    pub fn tracing_level(self) -> tracing::Level {
        if self < Self::DEBUG {
            tracing::Level::TRACE
        } else if self < Self::INFO {
            tracing::Level::DEBUG
        } else if self < Self::WARN {
            tracing::Level::INFO
        } else if self < Self::ERROR {
            tracing::Level::WARN
        } else {
            tracing::Level::ERROR
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::INFO
    }
}

impl From<i64> for Severity {
    fn from(value: i64) -> Self {
        Severity(value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, anchor) = if *self < Self::INFO {
            ("DEBUG", Self::DEBUG)
        } else if *self < Self::WARN {
            ("INFO", Self::INFO)
        } else if *self < Self::ERROR {
            ("WARN", Self::WARN)
        } else {
            ("ERROR", Self::ERROR)
        };

        let offset = self.0.saturating_sub(anchor.0);
        if offset == 0 {
            f.write_str(base)
        } else {
            write!(f, "{}{:+}", base, offset)
        }
    }
}

/// Error returned when a severity cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid severity: {0}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(named) = Self::NAMED.iter().find(|level| level.to_string() == s) {
            return Ok(*named);
        }
        s.parse::<i64>()
            .map(Severity)
            .map_err(|_| ParseSeverityError(s.to_string()))
    }
}

/// Errors raised while resolving the level from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("invalid integer value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Resolve a severity from `var` (or [`DEFAULT_LEVEL_ENV_VAR`] when empty).
///
/// Returns `default` when the variable is unset.
pub fn try_resolve_level(var: &str, default: Severity) -> Result<Severity, LevelError> {
    let var = if var.is_empty() { DEFAULT_LEVEL_ENV_VAR } else { var };

    let Some(raw) = std::env::var_os(var) else {
        return Ok(default);
    };
    let value = raw.to_string_lossy();

    value.parse::<Severity>().map_err(|_| LevelError::InvalidValue {
        var: var.to_string(),
        value: value.into_owned(),
    })
}

/// Like [`try_resolve_level`], but an invalid value is fatal.
///
/// Prints `httplog: <error>` to stderr and exits with status 1. Call this
/// during startup, before any request is served.
pub fn resolve_level(var: &str, default: Severity) -> Severity {
    match try_resolve_level(var, default) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("httplog: {}", e);
            std::process::exit(1);
        }
    }
}
