//! Default values for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::cache::DEFAULT_CACHE_DIR;
use crate::engine::{DEFAULT_ENGINE, DEFAULT_PUBLISH_INTERVAL, DEFAULT_TILE_ZOOM};
use crate::export::{DEFAULT_MAP_FILE, DEFAULT_TILE_FILE};
use crate::pump::DEFAULT_RATE_HZ;

/// Default output directory.
pub const DEFAULT_EXPORT_DIR: &str = ".";

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "mapfusion.log";

/// Default for coupling dashboard exit to the stop flag.
pub const DEFAULT_STOP_ON_GUI_EXIT: bool = true;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dataset: DatasetSettings::default(),
            cache: CacheSettings {
                directory: PathBuf::from(DEFAULT_CACHE_DIR),
            },
            engine: EngineConfig {
                name: DEFAULT_ENGINE.to_string(),
                tile_zoom: DEFAULT_TILE_ZOOM,
                publish_interval: DEFAULT_PUBLISH_INTERVAL,
            },
            pump: PumpSettings {
                rate_hz: DEFAULT_RATE_HZ,
                should_stop: false,
            },
            export: ExportSettings {
                directory: PathBuf::from(DEFAULT_EXPORT_DIR),
                tile_file: DEFAULT_TILE_FILE.to_string(),
                map_file: DEFAULT_MAP_FILE.to_string(),
            },
            app: AppSettings {
                stop_on_gui_exit: DEFAULT_STOP_ON_GUI_EXIT,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
