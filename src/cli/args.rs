//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::schema::keys;
use crate::domain::value::ValueType;

/// DeskPrefs - inspect and edit desktop application settings
#[derive(Parser, Debug)]
#[command(name = "deskprefs")]
#[command(version)]
#[command(about = "Inspect and edit deferred-write desktop application settings")]
#[command(long_about = None)]
pub struct Cli {
    /// Settings file to use instead of the XDG default
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<String>,

    /// Log level for diagnostics on stderr
    #[arg(
        long,
        value_name = "LEVEL",
        global = true,
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: Option<String>,

    /// Shortcut for --log-level debug
    #[arg(short = 'v', long, global = true, conflicts_with = "log_level")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Prefs(PrefsAction),

    /// Manage the tool configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PrefsAction {
    /// Show identity, version and first-run state
    Status,
    /// Print one setting
    Get {
        /// Setting key
        key: PrefKey,
    },
    /// Change one setting
    Set {
        /// Setting key
        key: PrefKey,
        /// New value (flags: true/false/1/0, sizes: WxH)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print all settings
    List,
    /// Restore window settings to their defaults
    Reset,
    /// Show settings file path
    Path,
}

/// Keys exposed on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrefKey {
    Version,
    WindowMaximized,
    WindowSize,
}

impl PrefKey {
    pub const ALL: [PrefKey; 3] = [Self::Version, Self::WindowMaximized, Self::WindowSize];

    /// Schema key name
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Version => keys::VERSION,
            Self::WindowMaximized => keys::WINDOW_MAXIMIZED,
            Self::WindowSize => keys::WINDOW_SIZE,
        }
    }

    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Version => ValueType::String,
            Self::WindowMaximized => ValueType::Bool,
            Self::WindowSize => ValueType::Int32Pair,
        }
    }

    /// Only written by the settings teardown
    pub const fn is_read_only(&self) -> bool {
        matches!(self, Self::Version)
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["store_path", "log_level"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
