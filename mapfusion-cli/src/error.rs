//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and the process exit codes.

use std::fmt;
use std::io;
use std::process;

use mapfusion::app::{AppError, EXIT_CONFIGURATION, EXIT_RUNTIME};
use mapfusion::cache::CacheDirError;
use mapfusion::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid configuration value or key
    Config(String),
    /// Failed to read or write the configuration file
    ConfigFile(ConfigFileError),
    /// Failed to start or join the mapping session
    App(AppError),
    /// Terminal dashboard failure
    Dashboard(io::Error),
    /// Failed to install the Ctrl+C handler
    SignalHandler(String),
    /// Failed to reset the cache directory
    CacheReset(CacheDirError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::ConfigFile(_) => EXIT_CONFIGURATION,
            _ => EXIT_RUNTIME,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigFile(ConfigFileError::InvalidValue { section, key, .. }) => {
                eprintln!();
                eprintln!(
                    "Fix the value with: mapfusion config set {}.{} <value>",
                    section, key
                );
            }
            CliError::Dashboard(_) => {
                eprintln!();
                eprintln!("If the terminal does not support the dashboard, run with --headless");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::App(e) => write!(f, "Mapping session error: {}", e),
            CliError::Dashboard(e) => write!(f, "Dashboard error: {}", e),
            CliError::SignalHandler(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::CacheReset(e) => write!(f, "Failed to reset cache directory: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Dashboard(e) => Some(e),
            CliError::CacheReset(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}
