//! Artifacts produced asynchronously by a mapping engine.
//!
//! An engine delivers results as an [`Artifact`], a closed set of variants:
//!
//! - [`Artifact::TileManager`] - a tiled raster product (orthomosaic, coverage)
//! - [`Artifact::Map`] - a sparse map / point cloud
//! - [`Artifact::Unknown`] - anything this build does not know how to route
//!
//! The payloads are trait objects because the engine owns their contents and
//! their on-disk format. Receivers only need metadata and `save()`.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

#[cfg(test)]
pub(crate) mod testing;

/// Errors raised while serializing an artifact to disk.
#[derive(Debug, Error)]
pub enum ArtifactSaveError {
    /// I/O error writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error.
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// The artifact has nothing to write.
    #[error("Artifact is empty: {0}")]
    Empty(String),

    /// The raster would exceed the encoder limit.
    #[error("Raster {width}x{height} exceeds the {max} pixel limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

/// A tiled raster product.
pub trait TileManager: Send + Sync + fmt::Debug {
    /// Number of tiles currently held.
    fn tile_count(&self) -> usize;

    /// Zoom level the tiles are indexed at.
    fn zoom(&self) -> u8;

    /// Persist the tiles to `path`. The format is owned by the implementation.
    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError>;
}

/// A sparse map.
pub trait Map: Send + Sync + fmt::Debug {
    /// Short description of the map type (e.g. "footprint", "sparse").
    fn kind(&self) -> &str;

    /// Number of frames that contributed to the map.
    fn frame_count(&self) -> usize;

    /// Persist the map to `path`. The format is owned by the implementation.
    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError>;
}

/// A result object delivered by an engine.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// Tiled raster product.
    TileManager(Arc<dyn TileManager>),
    /// Sparse map.
    Map(Arc<dyn Map>),
    /// An artifact kind this build does not route.
    Unknown {
        /// Engine-provided type name.
        kind: String,
    },
}

impl Artifact {
    /// Short variant name for logging.
    pub fn variant_name(&self) -> &str {
        match self {
            Artifact::TileManager(_) => "tile_manager",
            Artifact::Map(_) => "map",
            Artifact::Unknown { kind } => kind,
        }
    }
}

/// Capability to receive artifacts from an engine.
///
/// Engines may call [`on_artifact`](Self::on_artifact) from any thread, any
/// number of times, in no particular order relative to frame ingestion.
pub trait ArtifactReceiver: Send + Sync {
    /// Handle one delivered artifact.
    fn on_artifact(&self, artifact: Artifact);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EmptyMap;

    impl Map for EmptyMap {
        fn kind(&self) -> &str {
            "empty"
        }

        fn frame_count(&self) -> usize {
            0
        }

        fn save(&self, _path: &Path) -> Result<(), ArtifactSaveError> {
            Err(ArtifactSaveError::Empty("no frames".to_string()))
        }
    }

    #[test]
    fn test_variant_names() {
        let map = Artifact::Map(Arc::new(EmptyMap));
        let unknown = Artifact::Unknown {
            kind: "mesh".to_string(),
        };

        assert_eq!(map.variant_name(), "map");
        assert_eq!(unknown.variant_name(), "mesh");
    }

    #[test]
    fn test_save_error_display() {
        let err = EmptyMap.save(Path::new("out.ply")).unwrap_err();
        assert_eq!(err.to_string(), "Artifact is empty: no frames");
    }
}
