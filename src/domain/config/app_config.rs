//! Tool configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log level used when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted `log_level` values
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration of the `deskprefs` tool itself.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings file to use instead of the XDG default
    pub store_path: Option<String>,
    /// Tracing filter level
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            store_path: None,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            store_path: other.store_path.or(self.store_path),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Settings file override, if any
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    /// Log level if valid, otherwise the default
    pub fn log_level_or_default(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| VALID_LOG_LEVELS.contains(level))
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
