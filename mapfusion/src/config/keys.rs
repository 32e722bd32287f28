//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, used by
//! the `config get|set|list` commands.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DatasetPath,
    CacheDirectory,
    EngineName,
    EngineTileZoom,
    EnginePublishInterval,
    PumpRateHz,
    PumpShouldStop,
    ExportDirectory,
    ExportTileFile,
    ExportMapFile,
    AppStopOnGuiExit,
    LoggingDirectory,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Get the canonical key name (e.g., "pump.rate_hz").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::DatasetPath => "dataset.path",
            ConfigKey::CacheDirectory => "cache.directory",
            ConfigKey::EngineName => "engine.name",
            ConfigKey::EngineTileZoom => "engine.tile_zoom",
            ConfigKey::EnginePublishInterval => "engine.publish_interval",
            ConfigKey::PumpRateHz => "pump.rate_hz",
            ConfigKey::PumpShouldStop => "pump.should_stop",
            ConfigKey::ExportDirectory => "export.directory",
            ConfigKey::ExportTileFile => "export.tile_file",
            ConfigKey::ExportMapFile => "export.map_file",
            ConfigKey::AppStopOnGuiExit => "app.stop_on_gui_exit",
            ConfigKey::LoggingDirectory => "logging.directory",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Get the section name (e.g., "pump").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Get the key name within the section (e.g., "rate_hz").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Get the value from a config file as a string.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::DatasetPath => config.dataset.path.clone().unwrap_or_default(),
            ConfigKey::CacheDirectory => path_to_display(&config.cache.directory),
            ConfigKey::EngineName => config.engine.name.clone(),
            ConfigKey::EngineTileZoom => config.engine.tile_zoom.to_string(),
            ConfigKey::EnginePublishInterval => config.engine.publish_interval.to_string(),
            ConfigKey::PumpRateHz => config.pump.rate_hz.to_string(),
            ConfigKey::PumpShouldStop => (config.pump.should_stop as u8).to_string(),
            ConfigKey::ExportDirectory => path_to_display(&config.export.directory),
            ConfigKey::ExportTileFile => config.export.tile_file.clone(),
            ConfigKey::ExportMapFile => config.export.map_file.clone(),
            ConfigKey::AppStopOnGuiExit => config.app.stop_on_gui_exit.to_string(),
            ConfigKey::LoggingDirectory => path_to_display(&config.logging.directory),
            ConfigKey::LoggingFile => config.logging.file.clone(),
        }
    }

    /// Set the value in a config file.
    ///
    /// The config is left untouched when the value is rejected.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let v = value.trim();
        match self {
            ConfigKey::DatasetPath => {
                config.dataset.path = (!v.is_empty()).then(|| expand_tilde(v).display().to_string());
            }
            ConfigKey::CacheDirectory => config.cache.directory = self.path(v)?,
            ConfigKey::EngineName => {
                if v.is_empty() {
                    return Err(self.reject("must not be empty"));
                }
                config.engine.name = v.to_string();
            }
            ConfigKey::EngineTileZoom => {
                config.engine.tile_zoom = v
                    .parse::<u8>()
                    .ok()
                    .filter(|z| *z <= MAX_ZOOM)
                    .ok_or_else(|| self.reject("must be an integer 0-22"))?;
            }
            ConfigKey::EnginePublishInterval => {
                config.engine.publish_interval = v
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| self.reject("must be a positive integer"))?;
            }
            ConfigKey::PumpRateHz => {
                config.pump.rate_hz = v
                    .parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite() && *r >= 0.0)
                    .ok_or_else(|| self.reject("must be a non-negative number"))?;
            }
            ConfigKey::PumpShouldStop => {
                let flag = v
                    .parse::<i64>()
                    .map_err(|_| self.reject("must be an integer"))?;
                config.pump.should_stop = flag != 0;
            }
            ConfigKey::ExportDirectory => config.export.directory = self.path(v)?,
            ConfigKey::ExportTileFile => config.export.tile_file = self.file_name(v)?,
            ConfigKey::ExportMapFile => config.export.map_file = self.file_name(v)?,
            ConfigKey::AppStopOnGuiExit => {
                config.app.stop_on_gui_exit = parse_bool(v)
                    .ok_or_else(|| self.reject("must be true/false, yes/no, 1/0, or on/off"))?;
            }
            ConfigKey::LoggingDirectory => config.logging.directory = self.path(v)?,
            ConfigKey::LoggingFile => config.logging.file = self.file_name(v)?,
        }
        Ok(())
    }

    /// Get all supported configuration keys.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::DatasetPath,
            ConfigKey::CacheDirectory,
            ConfigKey::EngineName,
            ConfigKey::EngineTileZoom,
            ConfigKey::EnginePublishInterval,
            ConfigKey::PumpRateHz,
            ConfigKey::PumpShouldStop,
            ConfigKey::ExportDirectory,
            ConfigKey::ExportTileFile,
            ConfigKey::ExportMapFile,
            ConfigKey::AppStopOnGuiExit,
            ConfigKey::LoggingDirectory,
            ConfigKey::LoggingFile,
        ]
    }

    fn reject(&self, reason: &str) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        }
    }

    fn path(&self, value: &str) -> Result<PathBuf, ConfigKeyError> {
        if value.is_empty() {
            return Err(self.reject("must be a valid path"));
        }
        Ok(expand_tilde(value))
    }

    fn file_name(&self, value: &str) -> Result<String, ConfigKeyError> {
        if value.is_empty() || value.contains('/') || value.contains('\\') {
            return Err(self.reject("must be a plain file name"));
        }
        Ok(value.to_string())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse the boolean spellings accepted in config files.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Convert path to display string, collapsing home dir to ~.
pub(super) fn path_to_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
