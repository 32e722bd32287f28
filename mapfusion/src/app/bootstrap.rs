//! Application bootstrap implementation.
//!
//! `MapperApp` performs the startup sequence and owns the frame pump thread.
//! The caller keeps the main thread for the dashboard event loop.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::{reset_cache_dir, PrepareOutcome};
use crate::dataset::{DatasetSource, ManifestDataset};
use crate::dispatch::{ArtifactDispatcher, ArtifactStore, DispatchCounts};
use crate::engine::EngineRegistry;
use crate::export::ShutdownExporter;
use crate::pump::{FramePump, PumpReport, SharedPumpStatus};
use crate::visualizer::SharedVisualizer;

/// Name of the frame pump thread.
pub const PUMP_THREAD_NAME: &str = "frame-pump";

/// External collaborators wired into the application.
pub struct AppComponents {
    /// Frame source.
    pub dataset: Box<dyn DatasetSource>,
    /// Engines available by identifier.
    pub registry: EngineRegistry,
    /// Optional visualizer.
    pub visualizer: SharedVisualizer,
}

impl AppComponents {
    /// Create components without a visualizer.
    pub fn new(dataset: Box<dyn DatasetSource>, registry: EngineRegistry) -> Self {
        Self {
            dataset,
            registry,
            visualizer: None,
        }
    }

    /// Manifest dataset reader and the built-in engines.
    pub fn builtin() -> Self {
        Self::new(Box::new(ManifestDataset::new()), EngineRegistry::with_builtins())
    }

    /// Attach a visualizer.
    pub fn with_visualizer(mut self, visualizer: SharedVisualizer) -> Self {
        self.visualizer = visualizer;
        self
    }
}

/// A running mapping session.
///
/// # Example
///
/// ```ignore
/// use mapfusion::app::{AppComponents, AppConfig, MapperApp};
///
/// let app = MapperApp::start(config, AppComponents::builtin())?;
///
/// // main thread: run the dashboard until the user quits
/// run_dashboard(&app);
///
/// app.gui_closed();
/// let report = app.join()?;
/// ```
pub struct MapperApp {
    config: AppConfig,
    stop: CancellationToken,
    status: Arc<SharedPumpStatus>,
    dispatcher: Arc<ArtifactDispatcher>,
    cache: Option<PrepareOutcome>,
    handle: JoinHandle<PumpReport>,
}

impl MapperApp {
    /// Start a session.
    ///
    /// 1. Clears and recreates the cache directory (failure is logged, not fatal)
    /// 2. Builds the artifact store, dispatcher and exporter
    /// 3. Shows the visualizer
    /// 4. Spawns the frame pump thread
    ///
    /// # Errors
    ///
    /// Returns an error only if the pump thread cannot be spawned. Pump
    /// failures are reported by [`join`](Self::join).
    pub fn start(config: AppConfig, components: AppComponents) -> Result<Self, AppError> {
        info!(version = crate::VERSION, "Starting MapFusion");

        let cache = match reset_cache_dir(&config.cache_dir) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "Cache directory preparation failed, continuing");
                None
            }
        };

        let store = Arc::new(ArtifactStore::new());
        let dispatcher = Arc::new(ArtifactDispatcher::new(
            Arc::clone(&store),
            components.visualizer.clone(),
        ));
        let exporter = ShutdownExporter::new(store, config.export.clone());

        if let Some(vis) = &components.visualizer {
            vis.show();
        }

        let stop = CancellationToken::new();
        if config.should_stop {
            info!("Stop flag raised by configuration");
            stop.cancel();
        }

        let status = Arc::new(SharedPumpStatus::new());
        let pump = FramePump::new(
            config.pump_config(),
            components.dataset,
            components.registry,
            Arc::clone(&dispatcher),
            exporter,
            stop.clone(),
        )
        .with_visualizer(components.visualizer)
        .with_status(Arc::clone(&status));

        let handle = thread::Builder::new()
            .name(PUMP_THREAD_NAME.to_string())
            .spawn(move || pump.run())
            .map_err(AppError::ThreadSpawn)?;

        Ok(Self {
            config,
            stop,
            status,
            dispatcher,
            cache,
            handle,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// A handle to the stop flag.
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    /// Raise the stop flag. The pump exits at its next stop check.
    pub fn request_stop(&self) {
        if !self.stop.is_cancelled() {
            info!("Stop requested");
            self.stop.cancel();
        }
    }

    /// Pump progress.
    pub fn status(&self) -> Arc<SharedPumpStatus> {
        Arc::clone(&self.status)
    }

    /// Artifacts received so far.
    pub fn dispatch_counts(&self) -> DispatchCounts {
        self.dispatcher.counts()
    }

    /// Result of the startup cache reset, `None` if it failed.
    pub fn cache_outcome(&self) -> Option<&PrepareOutcome> {
        self.cache.as_ref()
    }

    /// Whether the pump thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Notify the session that the dashboard closed.
    pub fn gui_closed(&self) {
        if self.config.stop_on_gui_exit {
            self.request_stop();
        } else if !self.is_finished() {
            info!("Dashboard closed, frame pump keeps running until the dataset ends");
        }
    }

    /// Wait for the pump thread to terminate.
    pub fn join(self) -> Result<PumpReport, AppError> {
        self.handle.join().map_err(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            AppError::PumpPanicked(msg)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CameraDescriptor, DatasetError, Frame, GeoPosition};
    use crate::pump::{PumpError, PumpOutcome, PumpState};
    use crate::visualizer::testing::{RecordingVisualizer, VisualizerCall};
    use crate::visualizer::Visualizer;
    use image::DynamicImage;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Endless dataset producing valid geotagged frames.
    struct EndlessDataset {
        grabs: Arc<AtomicUsize>,
    }

    impl DatasetSource for EndlessDataset {
        fn open(&mut self, _uri: &str) -> Result<(), DatasetError> {
            Ok(())
        }

        fn grab_frame(&mut self) -> Option<Frame> {
            let id = self.grabs.fetch_add(1, Ordering::SeqCst) as u64;
            let camera = CameraDescriptor::pinhole(8, 6, 10.0, 10.0, 4.0, 3.0);
            Some(
                Frame::new(id, id as f64, DynamicImage::new_rgb8(8, 6), camera)
                    .with_gps(GeoPosition::new(48.0, 11.0, 60.0)),
            )
        }
    }

    fn config(temp: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.dataset = Some("endless".to_string());
        config.cache_dir = temp.path().join("cache");
        config.engine.cache_dir = config.cache_dir.clone();
        config.export.directory = temp.path().to_path_buf();
        config.rate_hz = 500.0;
        config
    }

    fn components(grabs: &Arc<AtomicUsize>) -> AppComponents {
        AppComponents::new(
            Box::new(EndlessDataset {
                grabs: Arc::clone(grabs),
            }),
            EngineRegistry::with_builtins(),
        )
    }

    fn wait_for_frames(app: &MapperApp, frames: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.status().snapshot().frames_tracked < frames && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_resets_cache_directory() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp);
        fs::create_dir_all(config.cache_dir.join("stale")).unwrap();
        fs::write(config.cache_dir.join("stale/file.bin"), b"x").unwrap();
        let grabs = Arc::new(AtomicUsize::new(0));

        let mut config = config;
        config.should_stop = true;
        let app = MapperApp::start(config.clone(), components(&grabs)).unwrap();
        assert!(matches!(
            app.cache_outcome(),
            Some(PrepareOutcome::Cleared { files_removed: 1, dirs_removed: 2 })
        ));
        let report = app.join().unwrap();

        assert!(matches!(report.outcome, PumpOutcome::Stopped));
        assert!(config.cache_dir.is_dir());
        assert!(!config.cache_dir.join("stale").exists());
    }

    #[test]
    fn test_cache_reset_failure_does_not_block_run() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        // A regular file where the cache directory's parent should be
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        config.cache_dir = blocker.join("cache");
        config.engine.cache_dir = config.cache_dir.clone();
        let grabs = Arc::new(AtomicUsize::new(0));

        let app = MapperApp::start(config, components(&grabs)).unwrap();
        assert!(app.cache_outcome().is_none());

        wait_for_frames(&app, 2);
        app.request_stop();
        let status = app.status();
        let report = app.join().unwrap();

        assert!(matches!(report.outcome, PumpOutcome::Stopped));
        assert!(report.frames_tracked >= 2);
        assert_eq!(status.state(), PumpState::Terminated);
        assert!(report.export.is_some());
    }

    #[test]
    fn test_should_stop_reads_no_frames() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.should_stop = true;
        let grabs = Arc::new(AtomicUsize::new(0));

        let app = MapperApp::start(config, components(&grabs)).unwrap();
        let report = app.join().unwrap();

        assert!(matches!(report.outcome, PumpOutcome::Stopped));
        assert_eq!(grabs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_dataset_reported_on_join() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.dataset = None;
        let grabs = Arc::new(AtomicUsize::new(0));

        let app = MapperApp::start(config, components(&grabs)).unwrap();
        let status = app.status();
        let report = app.join().unwrap();

        assert!(matches!(report.outcome, PumpOutcome::Failed(PumpError::NoDataset)));
        assert_eq!(grabs.load(Ordering::SeqCst), 0);
        assert_eq!(status.state(), PumpState::Terminated);
    }

    #[test]
    fn test_gui_close_stops_pump_and_exports() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.engine.publish_interval = 1;
        let grabs = Arc::new(AtomicUsize::new(0));
        let vis = Arc::new(RecordingVisualizer::new());
        let shared: Arc<dyn Visualizer> = vis.clone();

        let app = MapperApp::start(
            config.clone(),
            components(&grabs).with_visualizer(Some(shared)),
        )
        .unwrap();
        wait_for_frames(&app, 3);
        app.gui_closed();
        let report = app.join().unwrap();

        assert!(matches!(report.outcome, PumpOutcome::Stopped));
        assert!(report.frames_tracked >= 3);
        let calls = vis.calls();
        assert_eq!(calls[0], VisualizerCall::Show);
        assert_eq!(vis.home_calls(), 1);
        assert!(report.export.is_some());
    }

    #[test]
    fn test_keep_running_on_gui_exit() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.stop_on_gui_exit = false;
        let grabs = Arc::new(AtomicUsize::new(0));

        let app = MapperApp::start(config, components(&grabs)).unwrap();
        wait_for_frames(&app, 1);
        app.gui_closed();

        assert!(!app.stop_token().is_cancelled());
        app.request_stop();
        let report = app.join().unwrap();
        assert!(matches!(report.outcome, PumpOutcome::Stopped));
    }
}
