//! Environment configuration for the Lambda adapter.

use serde::{Deserialize, Serialize};

/// Environment variable naming a stage prefix to strip from inbound paths.
pub const STRIP_BASE_PATH_ENV: &str = "GREETER_STRIP_BASE_PATH";

/// Adapter settings read at cold start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Base path removed from the front of every request path, if any.
    pub strip_base_path: Option<String>,
}

impl AdapterConfig {
    /// Create configuration from environment variables.
    ///
    /// - `GREETER_STRIP_BASE_PATH`: stage prefix to strip (optional)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let strip_base_path = lookup(STRIP_BASE_PATH_ENV).filter(|v| !v.trim().is_empty());
        Self { strip_base_path }
    }
}
