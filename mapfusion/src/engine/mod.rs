//! Mapping engine abstraction.
//!
//! A [`MappingEngine`] consumes frames and asynchronously produces
//! [`Artifact`](crate::artifact::Artifact)s, delivered to the receiver set
//! with [`MappingEngine::set_callback`]. Engines are resolved once at startup
//! by identifier through the [`EngineRegistry`]:
//!
//! ```ignore
//! use mapfusion::engine::EngineRegistry;
//!
//! let registry = EngineRegistry::with_builtins();
//! let mut engine = registry.load("footprint")?;
//! engine.set_callback(dispatcher);
//! engine.set_configuration(&settings);
//! engine.track(frame);
//! ```
//!
//! A statically linked engine and a dynamically discovered one differ only
//! in how they are registered.

mod footprint;
mod registry;

pub use footprint::{
    CoverageTiles, FootprintEngine, FootprintMap, MapPoint, PointKind, FOOTPRINT_ENGINE_ID,
    JOURNAL_FILE_NAME,
};
pub use registry::{EngineConstructor, EngineRegistry};

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::artifact::ArtifactReceiver;
use crate::dataset::Frame;

/// Default engine identifier.
pub const DEFAULT_ENGINE: &str = FOOTPRINT_ENGINE_ID;

/// Default zoom level for coverage tiles.
pub const DEFAULT_TILE_ZOOM: u8 = 17;

/// Default number of frames between artifact publications.
pub const DEFAULT_PUBLISH_INTERVAL: usize = 10;

/// Errors raised while loading an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No engine is registered under the identifier.
    #[error("Unknown engine '{id}' (available: {available})")]
    Unknown { id: String, available: String },

    /// The engine failed to initialize.
    #[error("Engine '{id}' failed to initialize: {reason}")]
    Init { id: String, reason: String },
}

/// Settings handed to an engine before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Scratch directory the engine may write intermediate data to.
    pub cache_dir: PathBuf,
    /// Zoom level for tiled products.
    pub tile_zoom: u8,
    /// Frames between artifact publications.
    pub publish_interval: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(crate::cache::DEFAULT_CACHE_DIR),
            tile_zoom: DEFAULT_TILE_ZOOM,
            publish_interval: DEFAULT_PUBLISH_INTERVAL,
        }
    }
}

/// A frame-consuming mapping engine.
///
/// `track` must not wait for artifacts: results are delivered later,
/// possibly from the engine's own threads, through the callback receiver.
pub trait MappingEngine: Send {
    /// Engine version string.
    fn version(&self) -> String;

    /// Set the receiver artifacts are delivered to.
    fn set_callback(&mut self, receiver: Arc<dyn ArtifactReceiver>);

    /// Apply configuration. Called once before the first `track`.
    fn set_configuration(&mut self, settings: &EngineSettings);

    /// Hand one frame to the engine.
    fn track(&mut self, frame: Arc<Frame>);

    /// Flush pending work and deliver the final artifacts.
    ///
    /// Called once after the last `track` and before the shutdown export.
    /// Artifacts delivered after this returns are not exported.
    fn finish(&mut self) {}
}
