//! bomgate CLI entry point.
//!
//! Parses arguments, initializes logging from the config's `[general]`
//! section, dispatches to a command handler, and maps the handler's error
//! to a process exit code.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use bomgate_core::config::{BomgateConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let general = general_section(&cli.config).await;
    if let Err(e) = logging::init_tracing(&general, cli.log_level.as_deref()) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }

    let writer = OutputWriter::new(cli.output);

    let result = run(cli.command, &cli.config, &writer).await;

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Commands, config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    match command {
        Commands::Generate(args) => commands::generate::execute(args, config_path, writer).await,
        Commands::Verify(args) => commands::verify::execute(args, config_path, writer).await,
        Commands::Enrich(args) => commands::enrich::execute(args, config_path, writer).await,
        Commands::Validate(args) => commands::validate::execute(args, config_path, writer).await,
        Commands::Tools(args) => commands::tools::execute(args, config_path, writer).await,
        Commands::Config(args) => commands::config::execute(args, config_path, writer).await,
    }
}

/// Best-effort read of the `[general]` section for logging setup.
///
/// A missing or broken config file falls back to defaults here; the
/// command handler reports the real error with logging already in place.
async fn general_section(config_path: &Path) -> GeneralConfig {
    let mut config = match BomgateConfig::from_file(config_path).await {
        Ok(config) => config,
        Err(_) => BomgateConfig::default(),
    };
    config.apply_env_overrides();
    config.general
}
