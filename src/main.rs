//! DeskPrefs CLI entry point

use std::process::ExitCode;

use clap::Parser;

use deskprefs::cli::{
    app::{init_logging, load_merged_config, run_prefs, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use deskprefs::domain::config::AppConfig;
use deskprefs::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Build CLI config from args
    let cli_config = AppConfig {
        store_path: cli.store.clone(),
        log_level: if cli.verbose {
            Some("debug".to_string())
        } else {
            cli.log_level.clone()
        },
    };

    // Merge config
    let config = load_merged_config(cli_config).await;
    init_logging(config.log_level_or_default());

    match cli.command {
        Commands::Config { action } => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Prefs(action) => run_prefs(action, &config),
    }
}
