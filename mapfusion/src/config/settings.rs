//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Dataset settings
    pub dataset: DatasetSettings,
    /// Scratch cache settings
    pub cache: CacheSettings,
    /// Mapping engine settings
    pub engine: EngineConfig,
    /// Frame pump settings
    pub pump: PumpSettings,
    /// Shutdown export settings
    pub export: ExportSettings,
    /// Application shell settings
    pub app: AppSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Dataset configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetSettings {
    /// Dataset path or URI. Required to start a run.
    pub path: Option<String>,
}

/// Cache directory configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Scratch directory, cleared at every start
    pub directory: PathBuf,
}

/// `[engine]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Engine identifier
    pub name: String,
    /// Coverage tile zoom level
    pub tile_zoom: u8,
    /// Frames between artifact publications
    pub publish_interval: usize,
}

/// Frame pump configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSettings {
    /// Loop rate in Hz (0 = unthrottled)
    pub rate_hz: f64,
    /// Start with the stop flag raised
    pub should_stop: bool,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Output directory
    pub directory: PathBuf,
    /// Tile manager file name
    pub tile_file: String,
    /// Map file name
    pub map_file: String,
}

/// Application shell configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Raise the stop flag when the dashboard closes
    pub stop_on_gui_exit: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log directory
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
