//! Configuration for MapFusion.
//!
//! The user configuration lives in `~/.mapfusion/config.ini`:
//!
//! ```ini
//! [dataset]
//! path = /data/flight01
//!
//! [pump]
//! rate_hz = 100
//! ```
//!
//! Missing files and missing keys fall back to defaults; invalid values are
//! rejected with the offending `section.key`. [`ConfigKey`] gives typed
//! get/set access by name.

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_EXPORT_DIR, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, DEFAULT_STOP_ON_GUI_EXIT,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    AppSettings, CacheSettings, ConfigFile, DatasetSettings, EngineConfig, ExportSettings,
    LoggingSettings, PumpSettings,
};
