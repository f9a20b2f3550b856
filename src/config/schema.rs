//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

use crate::observability::level::{Severity, DEFAULT_LEVEL_ENV_VAR};

/// Request logger configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpLogConfig {
    /// Environment variable holding the structured log level.
    pub level_env_var: String,

    /// Level used when the variable is unset.
    pub default_level: Severity,

    /// Maximum request body buffered for writer-style handlers.
    pub max_body_bytes: usize,
}

impl Default for HttpLogConfig {
    fn default() -> Self {
        Self {
            level_env_var: DEFAULT_LEVEL_ENV_VAR.to_string(),
            default_level: Severity::INFO,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}
