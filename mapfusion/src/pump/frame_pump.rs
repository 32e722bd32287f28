//! The frame pump loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::error::PumpError;
use super::rate::Rate;
use super::status::{PumpEnd, SharedPumpStatus};
use crate::artifact::ArtifactReceiver;
use crate::dataset::{DatasetSource, Frame, GeoPosition};
use crate::dispatch::ArtifactDispatcher;
use crate::engine::{EngineRegistry, EngineSettings, MappingEngine, DEFAULT_ENGINE};
use crate::export::{ExportReport, ShutdownExporter};
use crate::visualizer::SharedVisualizer;

/// Default pacing rate in Hz.
pub const DEFAULT_RATE_HZ: f64 = 100.0;

/// Pump configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpConfig {
    /// Dataset URI handed to [`DatasetSource::open`].
    pub dataset: Option<String>,
    /// Engine identifier resolved through the registry.
    pub engine_id: String,
    /// Loop rate in Hz; zero disables pacing.
    pub rate_hz: f64,
    /// Settings passed to the engine.
    pub engine: EngineSettings,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            engine_id: DEFAULT_ENGINE.to_string(),
            rate_hz: DEFAULT_RATE_HZ,
            engine: EngineSettings::default(),
        }
    }
}

/// How the pump ended.
#[derive(Debug)]
pub enum PumpOutcome {
    /// The dataset ran out of frames.
    Completed,
    /// The stop flag was raised.
    Stopped,
    /// A fatal error ended the run, or prevented it from starting.
    Failed(PumpError),
}

impl PumpOutcome {
    /// The error, if the pump failed.
    pub fn error(&self) -> Option<&PumpError> {
        match self {
            PumpOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn end(&self) -> PumpEnd {
        match self {
            PumpOutcome::Completed => PumpEnd::Completed,
            PumpOutcome::Stopped => PumpEnd::Stopped,
            PumpOutcome::Failed(_) => PumpEnd::Failed,
        }
    }
}

/// Summary of a finished pump run.
#[derive(Debug)]
pub struct PumpReport {
    pub outcome: PumpOutcome,
    pub frames_grabbed: u64,
    pub frames_tracked: u64,
    /// Home position fixed from the first frame, if any.
    pub home: Option<GeoPosition>,
    /// Export results; `None` when the pump never started.
    pub export: Option<ExportReport>,
}

/// Pulls frames from a dataset and feeds them to an engine at a fixed rate.
///
/// ```text
/// Idle ──start ok──► Running ──stop / end / error──► Terminated ──► export
///   │                                                     ▲
///   └──────────────────start failed───────────────────────┘ (no export)
/// ```
pub struct FramePump {
    config: PumpConfig,
    dataset: Box<dyn DatasetSource>,
    registry: EngineRegistry,
    dispatcher: Arc<ArtifactDispatcher>,
    visualizer: SharedVisualizer,
    exporter: ShutdownExporter,
    stop: CancellationToken,
    status: Arc<SharedPumpStatus>,
}

impl FramePump {
    /// Create a pump.
    pub fn new(
        config: PumpConfig,
        dataset: Box<dyn DatasetSource>,
        registry: EngineRegistry,
        dispatcher: Arc<ArtifactDispatcher>,
        exporter: ShutdownExporter,
        stop: CancellationToken,
    ) -> Self {
        Self {
            config,
            dataset,
            registry,
            dispatcher,
            visualizer: None,
            exporter,
            stop,
            status: Arc::new(SharedPumpStatus::new()),
        }
    }

    /// Attach a visualizer for home position updates.
    pub fn with_visualizer(mut self, visualizer: SharedVisualizer) -> Self {
        self.visualizer = visualizer;
        self
    }

    /// Publish progress into an existing status.
    pub fn with_status(mut self, status: Arc<SharedPumpStatus>) -> Self {
        self.status = status;
        self
    }

    /// Shared progress counters.
    pub fn status(&self) -> Arc<SharedPumpStatus> {
        Arc::clone(&self.status)
    }

    /// Run to completion on the calling thread.
    pub fn run(mut self) -> PumpReport {
        let mut engine = match self.start() {
            Ok(engine) => engine,
            Err(e) => {
                error!(kind = %e.kind(), "{}", e);
                self.status.mark_terminated(PumpEnd::Failed);
                return PumpReport {
                    outcome: PumpOutcome::Failed(e),
                    frames_grabbed: 0,
                    frames_tracked: 0,
                    home: None,
                    export: None,
                };
            }
        };

        self.status.mark_running();
        let mut run = RunCounters::default();
        let outcome = self.pump(engine.as_mut(), &mut run);

        match &outcome {
            PumpOutcome::Completed => info!("Dataset processed."),
            PumpOutcome::Stopped => info!("Stop requested, frame pump exiting"),
            PumpOutcome::Failed(e) => error!(kind = %e.kind(), "{}", e),
        }

        engine.finish();
        let export = self.exporter.export_all();
        self.status.mark_terminated(outcome.end());
        info!(
            grabbed = run.grabbed,
            tracked = run.tracked,
            exports = export.attempts(),
            "Frame pump terminated"
        );

        drop(engine);

        PumpReport {
            outcome,
            frames_grabbed: run.grabbed,
            frames_tracked: run.tracked,
            home: run.home,
            export: Some(export),
        }
    }

    fn start(&mut self) -> Result<Box<dyn MappingEngine>, PumpError> {
        let uri = self
            .config
            .dataset
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(PumpError::NoDataset)?
            .to_string();

        self.dataset
            .open(&uri)
            .map_err(|source| PumpError::DatasetOpen {
                uri: uri.clone(),
                source,
            })?;

        let mut engine = self.registry.load(&self.config.engine_id)?;
        info!(
            engine = %self.config.engine_id,
            version = %engine.version(),
            "Loaded mapping engine"
        );

        let receiver: Arc<dyn ArtifactReceiver> = self.dispatcher.clone();
        engine.set_callback(receiver);
        engine.set_configuration(&self.config.engine);
        Ok(engine)
    }

    fn pump(&mut self, engine: &mut dyn MappingEngine, run: &mut RunCounters) -> PumpOutcome {
        let mut rate = Rate::new(self.config.rate_hz);

        loop {
            rate.sleep();

            if self.stop.is_cancelled() {
                return PumpOutcome::Stopped;
            }

            let Some(frame) = self.dataset.grab_frame() else {
                return PumpOutcome::Completed;
            };
            run.grabbed += 1;
            self.status.frame_grabbed();

            if let Err(e) = validate(&frame) {
                return PumpOutcome::Failed(e);
            }

            if run.home.is_none() {
                match self.initialize_home(&frame) {
                    Ok(home) => run.home = Some(home),
                    Err(e) => return PumpOutcome::Failed(e),
                }
            }

            debug!(frame = frame.id, timestamp = frame.timestamp, "Tracking frame");
            engine.track(Arc::new(frame));
            run.tracked += 1;
            self.status.frame_tracked();
        }
    }

    fn initialize_home(&self, frame: &Frame) -> Result<GeoPosition, PumpError> {
        let home = frame
            .gps_lla()
            .ok_or(PumpError::NoGps { frame: frame.id })?;

        info!(home = %home, "Home position set from first frame");
        self.status.set_home(&home);
        if let Some(vis) = &self.visualizer {
            vis.set_home_gps_position(home);
            vis.go_home();
        }
        Ok(home)
    }
}

#[derive(Debug, Default)]
struct RunCounters {
    grabbed: u64,
    tracked: u64,
    home: Option<GeoPosition>,
}

fn validate(frame: &Frame) -> Result<(), PumpError> {
    if frame.has_empty_image() {
        return Err(PumpError::EmptyImage { frame: frame.id });
    }
    if !frame.camera.is_valid() {
        return Err(PumpError::InvalidCamera { frame: frame.id });
    }
    Ok(())
}
