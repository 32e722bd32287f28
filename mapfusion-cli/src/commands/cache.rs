//! Cache management CLI commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use mapfusion::cache::{reset_cache_dir, PrepareOutcome};
use mapfusion::config::ConfigFile;

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete and recreate the scratch cache directory
    Reset {
        /// Directory to reset instead of the configured one
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config_path: &Path) -> Result<(), CliError> {
    match action {
        CacheAction::Reset { cache_dir } => {
            let dir = match cache_dir {
                Some(dir) => dir,
                None => ConfigFile::load_from(config_path)?.cache.directory,
            };
            println!("Resetting cache directory: {}", dir.display());

            let outcome = reset_cache_dir(&dir).map_err(CliError::CacheReset)?;
            println!("{}", describe(&outcome));
            Ok(())
        }
    }
}

fn describe(outcome: &PrepareOutcome) -> String {
    match outcome {
        PrepareOutcome::Absent => "Created (did not exist)".to_string(),
        PrepareOutcome::Cleared {
            files_removed,
            dirs_removed,
        } => format!(
            "Removed {} files and {} directories",
            files_removed, dirs_removed
        ),
    }
}
