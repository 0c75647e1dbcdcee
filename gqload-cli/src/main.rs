use anyhow::{Context, Result};
use clap::Parser;
use gqload_config::GqloadConfig;
use gqload_logging::{init_logging_from_config, init_simple_tracing};
use std::process::ExitCode;
use tracing::{info, warn};

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{handle_config_generate, handle_config_show, handle_config_validate, load_config};
use commands::list::handle_list;
use commands::run::{handle_run, RunOptions};

/// Initialize logging from the configuration file when one is given,
/// otherwise fall back to a plain subscriber at `--log-level`
fn init_logging(cli: &Cli, config: &GqloadConfig) -> Result<()> {
    if cli.config.is_some() {
        init_logging_from_config(&config.logging, cli.log_level.as_deref())
    } else {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| config.logging.level.to_string());
        init_simple_tracing(&level)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config subcommands load their own file; everything else uses --config
    let config = match &cli.command {
        Commands::Config { .. } => GqloadConfig::default(),
        _ => load_config(cli.config.as_ref())?,
    };
    init_logging(&cli, &config).context("Failed to initialize logging")?;

    info!("gqload starting");

    match cli.command {
        Commands::Run {
            scenario,
            vus,
            duration,
            iterations,
            seed,
            summary_json,
        } => {
            let options = RunOptions {
                scenario,
                vus,
                duration,
                iterations,
                seed,
                summary_json,
            };

            let summary = tokio::select! {
                summary = handle_run(config, options) => summary?,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, no summary produced");
                    return Ok(ExitCode::from(130));
                }
            };

            if summary.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                for failed in summary.failed_thresholds() {
                    warn!("Threshold failed: {} {}", failed.metric, failed.expression);
                }
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::List => {
            handle_list()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { config_cmd } => {
            match config_cmd {
                ConfigCommands::Validate { config_file } => handle_config_validate(&config_file)?,
                ConfigCommands::Generate { output, force } => handle_config_generate(&output, force)?,
                ConfigCommands::Show { config_file, format } => {
                    handle_config_show(config_file.as_ref().or(cli.config.as_ref()), &format)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
