//! voice-tasks CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_tasks::cli::{
    app::{
        load_merged_config, run_history, run_play, run_show, run_task, EXIT_ERROR,
        EXIT_USAGE_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_tasks::domain::config::AppConfig;
use voice_tasks::domain::error::ConfigError;
use voice_tasks::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Build CLI config from args (clap already folded VOICE_TASKS_DATA_DIR in)
    let cli_config = AppConfig {
        data_dir: cli
            .data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        ..Default::default()
    };

    match cli.command {
        // Config management works on the file directly, no merged config
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            match handle_config_command(action, &store, &presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.error(&e.to_string());
                    let code = match e {
                        ConfigError::ValidationError { .. } => EXIT_USAGE_ERROR,
                        _ => EXIT_ERROR,
                    };
                    ExitCode::from(code)
                }
            }
        }
        command => {
            let config = load_merged_config(cli_config).await;
            match command {
                Commands::Task { kind } => run_task(kind, &config).await,
                Commands::History { limit } => run_history(limit, &config).await,
                Commands::Show { id } => run_show(&id, &config).await,
                Commands::Play { id } => run_play(&id, &config).await,
                Commands::Config { .. } => unreachable!(), // Handled above
            }
        }
    }
}
