//! Application lifecycle: command dispatch, startup, server, shutdown

pub mod server;
pub mod shutdown;
pub mod startup;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::interfaces::cli;
use crate::system::init_logging;

pub use server::run_server;

/// Load config, install logging and validate, in that order so that
/// warnings raised while preparing the config reach the log.
fn load_config(
    path: Option<&str>,
) -> Result<(Arc<StaticConfig>, tracing_appender::non_blocking::WorkerGuard)> {
    let mut config = StaticConfig::load(path).context("Failed to load configuration")?;
    let guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    config.prepare().context("Invalid configuration")?;
    Ok((Arc::new(config), guard))
}

/// Entry point shared by `main`.
pub async fn run(args: Cli) -> Result<()> {
    let config_path = args.config.as_deref();

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let (config, _guard) = load_config(config_path)?;
            run_server(config).await
        }
        Commands::Migrate => {
            let config = StaticConfig::load(config_path).context("Failed to load configuration")?;
            let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
            cli::run_migrate(&config).await
        }
        Commands::HashPassword { password, stdin } => cli::run_hash_password(password, stdin),
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                cli::run_config_generate(output_path, force)
            }
        },
    }
}
