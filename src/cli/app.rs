//! Main app runner

use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, DEFAULT_LOG_LEVEL};
use crate::domain::schema::Schema;
use crate::infrastructure::{KeyfileBackend, XdgConfigStore};

use super::args::PrefsAction;
use super::prefs_cmd::handle_prefs_command;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the settings file
pub const ENV_STORE: &str = "DESKPREFS_STORE";

/// Environment variable overriding the log level
pub const ENV_LOG: &str = "DESKPREFS_LOG";

/// Run one settings command against the configured keyfile store
pub fn run_prefs(action: PrefsAction, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let backend = keyfile_backend(config);

    match handle_prefs_command(action, &backend, &presenter) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) if e.is_usage_error() => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_USAGE_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Keyfile store at the configured path with the application schema installed
pub fn keyfile_backend(config: &AppConfig) -> KeyfileBackend {
    config
        .store_path()
        .map(KeyfileBackend::with_path)
        .unwrap_or_default()
        .with_schema(Schema::application())
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    let env_config = AppConfig {
        store_path: env::var(ENV_STORE).ok().filter(|s| !s.is_empty()),
        log_level: env::var(ENV_LOG).ok().filter(|s| !s.is_empty()),
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Install the stderr tracing subscriber
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
