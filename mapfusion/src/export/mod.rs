//! Shutdown export of the latest artifacts.
//!
//! When the frame pump terminates, the [`ShutdownExporter`] writes the last
//! tile manager and the last map it finds in the [`ArtifactStore`] to fixed
//! output paths. Each save is attempted independently; a failure is logged
//! and never prevents the other.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::artifact::ArtifactSaveError;
use crate::dispatch::ArtifactStore;

/// Default tile export filename.
pub const DEFAULT_TILE_FILE: &str = "ortho.tif";

/// Default map export filename.
pub const DEFAULT_MAP_FILE: &str = "sparse.ply";

/// Where the exporter writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Output directory.
    pub directory: PathBuf,
    /// Tile manager file name.
    pub tile_file: String,
    /// Map file name.
    pub map_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            tile_file: DEFAULT_TILE_FILE.to_string(),
            map_file: DEFAULT_MAP_FILE.to_string(),
        }
    }
}

impl ExportConfig {
    /// Full path of the tile export.
    pub fn tile_path(&self) -> PathBuf {
        self.directory.join(&self.tile_file)
    }

    /// Full path of the map export.
    pub fn map_path(&self) -> PathBuf {
        self.directory.join(&self.map_file)
    }
}

/// Result of one export attempt.
#[derive(Debug)]
pub enum ExportOutcome {
    /// No artifact of this variant was ever received.
    Skipped,
    /// Written to the given path.
    Saved(PathBuf),
    /// Serialization failed.
    Failed {
        path: PathBuf,
        error: ArtifactSaveError,
    },
}

impl ExportOutcome {
    /// Whether an export was attempted.
    pub fn attempted(&self) -> bool {
        !matches!(self, ExportOutcome::Skipped)
    }

    /// Whether the attempt failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, ExportOutcome::Failed { .. })
    }
}

/// Outcome of [`ShutdownExporter::export_all`].
#[derive(Debug)]
pub struct ExportReport {
    pub tiles: ExportOutcome,
    pub map: ExportOutcome,
}

impl ExportReport {
    /// Number of save attempts made.
    pub fn attempts(&self) -> usize {
        self.tiles.attempted() as usize + self.map.attempted() as usize
    }

    /// Whether any attempt failed.
    pub fn has_failures(&self) -> bool {
        self.tiles.is_failure() || self.map.is_failure()
    }
}

/// Persists the latest artifacts at shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownExporter {
    store: Arc<ArtifactStore>,
    config: ExportConfig,
}

impl ShutdownExporter {
    /// Create an exporter reading from `store`.
    pub fn new(store: Arc<ArtifactStore>, config: ExportConfig) -> Self {
        Self { store, config }
    }

    /// Output configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Save the current tile manager and the current map.
    ///
    /// Both references are copied out under one lock acquisition; the
    /// serialization itself runs outside the lock.
    pub fn export_all(&self) -> ExportReport {
        let latest = self.store.snapshot();

        let tiles = match latest.tile_manager {
            Some(tiles) => {
                let path = self.config.tile_path();
                record("tiles", path, |p| tiles.save(p))
            }
            None => ExportOutcome::Skipped,
        };

        let map = match latest.map {
            Some(map) => {
                let path = self.config.map_path();
                record("map", path, |p| map.save(p))
            }
            None => ExportOutcome::Skipped,
        };

        ExportReport { tiles, map }
    }
}

fn record<F>(what: &str, path: PathBuf, save: F) -> ExportOutcome
where
    F: FnOnce(&Path) -> Result<(), ArtifactSaveError>,
{
    match save(&path) {
        Ok(()) => {
            info!(artifact = what, path = %path.display(), "Exported artifact");
            ExportOutcome::Saved(path)
        }
        Err(e) => {
            error!(artifact = what, path = %path.display(), error = %e, "Failed to export {}", what);
            ExportOutcome::Failed { path, error: e }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::testing::{MockMap, MockTileManager};

    fn exporter() -> (ShutdownExporter, Arc<ArtifactStore>) {
        let store = Arc::new(ArtifactStore::new());
        let config = ExportConfig {
            directory: PathBuf::from("/out"),
            ..Default::default()
        };
        (ShutdownExporter::new(Arc::clone(&store), config), store)
    }

    #[test]
    fn test_default_paths() {
        let config = ExportConfig::default();
        assert_eq!(config.tile_path(), PathBuf::from("./ortho.tif"));
        assert_eq!(config.map_path(), PathBuf::from("./sparse.ply"));
    }

    #[test]
    fn test_nothing_received_is_silent() {
        let (exporter, _store) = exporter();

        let report = exporter.export_all();

        assert!(matches!(report.tiles, ExportOutcome::Skipped));
        assert!(matches!(report.map, ExportOutcome::Skipped));
        assert_eq!(report.attempts(), 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_both_artifacts_saved_to_fixed_paths() {
        let (exporter, store) = exporter();
        let tiles = Arc::new(MockTileManager::new("t"));
        let map = Arc::new(MockMap::new("m", 3));
        store.store_tile_manager(tiles.clone());
        store.store_map(map.clone());

        let report = exporter.export_all();

        assert_eq!(report.attempts(), 2);
        assert_eq!(
            tiles.saved_to.lock().as_slice(),
            &[PathBuf::from("/out/ortho.tif")]
        );
        assert_eq!(
            map.saved_to.lock().as_slice(),
            &[PathBuf::from("/out/sparse.ply")]
        );
    }

    #[test]
    fn test_tile_failure_does_not_block_map() {
        let (exporter, store) = exporter();
        let map = Arc::new(MockMap::new("m", 3));
        store.store_tile_manager(Arc::new(MockTileManager::failing("t")));
        store.store_map(map.clone());

        let report = exporter.export_all();

        assert!(report.tiles.is_failure());
        assert!(matches!(report.map, ExportOutcome::Saved(_)));
        assert_eq!(map.save_count(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_map_failure_is_reported() {
        let (exporter, store) = exporter();
        store.store_map(Arc::new(MockMap::failing("m")));

        let report = exporter.export_all();

        assert!(matches!(report.tiles, ExportOutcome::Skipped));
        assert!(report.map.is_failure());
    }

    #[test]
    fn test_only_latest_artifact_is_exported() {
        let (exporter, store) = exporter();
        let first = Arc::new(MockMap::new("first", 1));
        let second = Arc::new(MockMap::new("second", 2));
        store.store_map(first.clone());
        store.store_map(second.clone());

        exporter.export_all();

        assert_eq!(first.save_count(), 0);
        assert_eq!(second.save_count(), 1);
    }
}
