//! Artifact doubles for unit tests.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{ArtifactSaveError, Map, TileManager};

/// Tile manager that records where it was saved.
#[derive(Debug, Default)]
pub struct MockTileManager {
    pub label: String,
    pub fail: bool,
    pub saved_to: Mutex<Vec<PathBuf>>,
}

impl MockTileManager {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }

    pub fn failing(label: &str) -> Self {
        Self {
            label: label.to_string(),
            fail: true,
            ..Default::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved_to.lock().len()
    }
}

impl TileManager for MockTileManager {
    fn tile_count(&self) -> usize {
        4
    }

    fn zoom(&self) -> u8 {
        17
    }

    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError> {
        self.saved_to.lock().push(path.to_path_buf());
        if self.fail {
            return Err(ArtifactSaveError::Empty(self.label.clone()));
        }
        Ok(())
    }
}

/// Map that records where it was saved.
#[derive(Debug, Default)]
pub struct MockMap {
    pub label: String,
    pub frames: usize,
    pub fail: bool,
    pub saved_to: Mutex<Vec<PathBuf>>,
}

impl MockMap {
    pub fn new(label: &str, frames: usize) -> Self {
        Self {
            label: label.to_string(),
            frames,
            ..Default::default()
        }
    }

    pub fn failing(label: &str) -> Self {
        Self {
            label: label.to_string(),
            fail: true,
            ..Default::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved_to.lock().len()
    }
}

impl Map for MockMap {
    fn kind(&self) -> &str {
        &self.label
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError> {
        self.saved_to.lock().push(path.to_path_buf());
        if self.fail {
            return Err(ArtifactSaveError::Empty(self.label.clone()));
        }
        Ok(())
    }
}
