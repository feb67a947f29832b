//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting and the command handlers.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod prefs_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_prefs, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, PrefKey, PrefsAction};
pub use presenter::Presenter;
