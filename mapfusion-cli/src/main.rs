//! MapFusion CLI - Command-line interface
//!
//! Streams a dataset into a mapping engine on a background thread while the
//! main thread runs the terminal dashboard, then exports the results.

mod commands;
mod error;
mod tui_app;
mod ui;
mod visualizer;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use mapfusion::app::{EXIT_OK, EXIT_RUNTIME};
use mapfusion::config::config_file_path;

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "mapfusion")]
#[command(version, about = "Real-time aerial mapping shell", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Configuration file (default: ~/.mapfusion/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a mapping session (default when no command is given)
    Run(RunArgs),

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage the scratch cache directory
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version are not misuse
            process::exit(if e.use_stderr() { EXIT_RUNTIME } else { EXIT_OK });
        }
    };

    let config_path = cli.config.unwrap_or_else(config_file_path);

    let result = match cli.command {
        None => commands::run::run(cli.run, &config_path),
        Some(Commands::Run(args)) => commands::run::run(args, &config_path),
        Some(Commands::Config { command }) => {
            commands::config::run(command, &config_path).map(|()| EXIT_OK)
        }
        Some(Commands::Cache { action }) => {
            commands::cache::run(action, &config_path).map(|()| EXIT_OK)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => e.exit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_flags_run_by_default() {
        let cli = Cli::try_parse_from(["mapfusion", "--dataset", "/data", "--headless"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.dataset.as_deref(), Some("/data"));
        assert!(cli.run.headless);
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["mapfusion", "config", "list", "--config", "/tmp/c.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::List
            })
        ));
    }

    #[test]
    fn test_run_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "mapfusion",
            "run",
            "--rate",
            "0",
            "--keep-running-on-exit",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.rate, Some(0.0));
                assert!(args.keep_running_on_exit);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_unknown_flag_is_error() {
        assert!(Cli::try_parse_from(["mapfusion", "--turbo"]).is_err());
    }
}
