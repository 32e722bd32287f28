//! Application configuration for MapperApp.
//!
//! `AppConfig` is built once from the `ConfigFile` plus command-line
//! overrides, then passed down unchanged.

use std::path::PathBuf;

use crate::config::ConfigFile;
use crate::engine::EngineSettings;
use crate::export::ExportConfig;
use crate::pump::PumpConfig;

/// Application configuration combining all component configs.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Dataset path; `None` makes the pump fail with a configuration error.
    pub dataset: Option<String>,

    /// Scratch directory cleared at startup.
    pub cache_dir: PathBuf,

    /// Engine identifier.
    pub engine_id: String,

    /// Settings handed to the engine.
    pub engine: EngineSettings,

    /// Frame pump rate in Hz.
    pub rate_hz: f64,

    /// Start with the stop flag raised.
    pub should_stop: bool,

    /// Shutdown export paths.
    pub export: ExportConfig,

    /// Raise the stop flag when the dashboard closes.
    pub stop_on_gui_exit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}

/// Values given on the command line, overriding the config file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub dataset: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub engine: Option<String>,
    pub rate_hz: Option<f64>,
    pub output_dir: Option<PathBuf>,
    /// Keep pumping after the dashboard closes.
    pub keep_running_on_exit: bool,
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            dataset: config.dataset.path.clone(),
            cache_dir: config.cache.directory.clone(),
            engine_id: config.engine.name.clone(),
            engine: EngineSettings {
                cache_dir: config.cache.directory.clone(),
                tile_zoom: config.engine.tile_zoom,
                publish_interval: config.engine.publish_interval,
            },
            rate_hz: config.pump.rate_hz,
            should_stop: config.pump.should_stop,
            export: ExportConfig {
                directory: config.export.directory.clone(),
                tile_file: config.export.tile_file.clone(),
                map_file: config.export.map_file.clone(),
            },
            stop_on_gui_exit: config.app.stop_on_gui_exit,
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dataset) = overrides.dataset.filter(|d| !d.trim().is_empty()) {
            self.dataset = Some(dataset);
        }
        if let Some(dir) = overrides.cache_dir {
            self.engine.cache_dir = dir.clone();
            self.cache_dir = dir;
        }
        if let Some(engine) = overrides.engine {
            self.engine_id = engine;
        }
        if let Some(rate) = overrides.rate_hz {
            self.rate_hz = rate;
        }
        if let Some(dir) = overrides.output_dir {
            self.export.directory = dir;
        }
        if overrides.keep_running_on_exit {
            self.stop_on_gui_exit = false;
        }
        self
    }

    /// Frame pump configuration.
    pub fn pump_config(&self) -> PumpConfig {
        PumpConfig {
            dataset: self.dataset.clone(),
            engine_id: self.engine_id.clone(),
            rate_hz: self.rate_hz,
            engine: self.engine.clone(),
        }
    }
}
