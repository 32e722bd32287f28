//! Run command - stream a dataset through the mapping engine.
//!
//! Loads configuration, initializes logging, starts the session and then
//! hands the main thread to the dashboard (or the headless loop).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Args;
use tracing::{error, info};

use mapfusion::app::{
    exit_code_for, AppComponents, AppConfig, ConfigOverrides, MapperApp,
};
use mapfusion::config::ConfigFile;
use mapfusion::export::ExportOutcome;
use mapfusion::logging::init_logging;
use mapfusion::pump::PumpOutcome;
use mapfusion::visualizer::Visualizer;

use crate::error::CliError;
use crate::tui_app::{self, TuiAppConfig};
use crate::ui::dashboard::print_session_summary;
use crate::visualizer::DashboardVisualizer;

/// Arguments for the run command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Dataset path: a manifest file or a directory containing manifest.json
    #[arg(long, value_name = "PATH")]
    pub dataset: Option<String>,

    /// Scratch directory cleared before the run
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Mapping engine identifier
    #[arg(long, value_name = "ID")]
    pub engine: Option<String>,

    /// Frame rate in Hz (0 = as fast as possible)
    #[arg(long, value_name = "HZ")]
    pub rate: Option<f64>,

    /// Directory receiving the exported tile and map files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print status lines instead of the dashboard
    #[arg(long)]
    pub headless: bool,

    /// Keep the frame pump running after the dashboard closes
    #[arg(long)]
    pub keep_running_on_exit: bool,
}

impl RunArgs {
    /// Command-line values overriding the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dataset: self.dataset.clone(),
            cache_dir: self.cache_dir.clone(),
            engine: self.engine.clone(),
            rate_hz: self.rate,
            output_dir: self.output_dir.clone(),
            keep_running_on_exit: self.keep_running_on_exit,
        }
    }
}

/// Resolve the session configuration from the file and the arguments.
pub fn resolve_config(args: &RunArgs, config_path: &Path) -> Result<(ConfigFile, AppConfig), CliError> {
    let file = ConfigFile::load_from(config_path)?;
    if let Some(rate) = args.rate {
        if !rate.is_finite() {
            return Err(CliError::Config(format!("Invalid --rate '{}'", rate)));
        }
    }
    let config = AppConfig::from_config_file(&file).with_overrides(args.overrides());
    Ok((file, config))
}

/// Run the command. Returns the process exit code.
pub fn run(args: RunArgs, config_path: &Path) -> Result<i32, CliError> {
    let (file, config) = resolve_config(&args, config_path)?;

    // The dashboard owns stdout, so console logging only in headless mode
    let headless = args.headless || !atty::is(atty::Stream::Stdout);
    let _logging_guard = init_logging(&file.logging.directory, &file.logging.file, headless)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    info!("MapFusion v{}", mapfusion::VERSION);
    info!(
        config = %config_path.display(),
        headless,
        "MapFusion CLI: run command"
    );

    let visualizer = DashboardVisualizer::new();
    let shared: Arc<dyn Visualizer> = Arc::new(visualizer.clone());
    let components = AppComponents::builtin().with_visualizer(Some(shared));
    let app = MapperApp::start(config, components)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    let stop = app.stop_token();
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        stop.cancel();
    }) {
        app.request_stop();
        let _ = app.join();
        return Err(CliError::SignalHandler(e.to_string()));
    }

    let ui_result = if headless {
        tui_app::run_headless(&app, &shutdown)
    } else {
        tui_app::run_tui(TuiAppConfig {
            app: &app,
            shutdown: Arc::clone(&shutdown),
            visualizer,
        })
    };

    app.gui_closed();
    if !app.is_finished() && !app.stop_token().is_cancelled() {
        println!("Dashboard closed, waiting for the frame pump to finish the dataset...");
    }
    let report = app.join()?;
    print_session_summary(&report);

    // A dashboard failure outranks the pump result
    ui_result?;

    if let PumpOutcome::Failed(e) = &report.outcome {
        error!(kind = %e.kind(), error = %e, "Mapping session failed");
        eprintln!("Error: {}", e);
    }
    if let Some(export) = &report.export {
        for outcome in [&export.tiles, &export.map] {
            if let ExportOutcome::Failed { path, error } = outcome {
                eprintln!("Error: failed to export {}: {}", path.display(), error);
            }
        }
    }

    let code = exit_code_for(&report);
    info!(exit_code = code, "MapFusion CLI exiting");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapfusion::app::{EXIT_CONFIGURATION, EXIT_OK};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ini");

        let (_, config) = resolve_config(&RunArgs::default(), &path).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_arguments_override_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[dataset]\npath = /from/file\n\n[pump]\nrate_hz = 30\n").unwrap();

        let args = RunArgs {
            dataset: Some("/from/cli".to_string()),
            output_dir: Some(PathBuf::from("/out")),
            keep_running_on_exit: true,
            ..Default::default()
        };
        let (file, config) = resolve_config(&args, &path).unwrap();

        assert_eq!(file.dataset.path.as_deref(), Some("/from/file"));
        assert_eq!(config.dataset.as_deref(), Some("/from/cli"));
        assert_eq!(config.rate_hz, 30.0);
        assert_eq!(config.export.directory, PathBuf::from("/out"));
        assert!(!config.stop_on_gui_exit);
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[pump]\nrate_hz = fast\n").unwrap();

        let err = resolve_config(&RunArgs::default(), &path).unwrap_err();

        assert_eq!(err.exit_code(), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        let temp = TempDir::new().unwrap();
        let args = RunArgs {
            rate: Some(f64::INFINITY),
            ..Default::default()
        };

        let err = resolve_config(&args, &temp.path().join("none.ini")).unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
        assert_ne!(err.exit_code(), EXIT_OK);
    }
}
