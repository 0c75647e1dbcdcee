//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario under load
    Run {
        /// Scenario name (see `gqload list`)
        #[arg(long, value_name = "NAME")]
        scenario: Option<String>,

        /// Constant number of virtual users; replaces the configured stages
        #[arg(long, value_name = "N", requires = "duration")]
        vus: Option<u32>,

        /// Run length in seconds, used with --vus
        #[arg(long, value_name = "SECS", requires = "vus")]
        duration: Option<u64>,

        /// Stop each virtual user after this many iterations
        #[arg(long, value_name = "N")]
        iterations: Option<u64>,

        /// Seed for deterministic parameter and credential selection
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Write the run summary as JSON to this file
        #[arg(long, value_name = "PATH")]
        summary_json: Option<PathBuf>,
    },

    /// List scenarios and registered operations
    List,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Path to configuration file (optional, uses default loading logic)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "gqload", "--log-level", "debug", "run", "--scenario", "order", "--vus", "5", "--duration", "30", "--seed",
            "7",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Run {
                scenario,
                vus,
                duration,
                seed,
                iterations,
                summary_json,
            } => {
                assert_eq!(scenario.as_deref(), Some("order"));
                assert_eq!(vus, Some(5));
                assert_eq!(duration, Some(30));
                assert_eq!(seed, Some(7));
                assert!(iterations.is_none());
                assert!(summary_json.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_vus_requires_duration() {
        assert!(Cli::try_parse_from(["gqload", "run", "--vus", "5"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["gqload", "list", "--config", "load.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("load.yaml")));
        assert!(matches!(cli.command, Commands::List));
    }
}
