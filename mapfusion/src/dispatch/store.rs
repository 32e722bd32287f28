//! Latest-artifact storage shared by the dispatcher and the exporter.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::artifact::{Map, TileManager};

/// Point-in-time copy of the stored artifacts.
#[derive(Debug, Clone, Default)]
pub struct StoredArtifacts {
    /// Most recently received tile manager.
    pub tile_manager: Option<Arc<dyn TileManager>>,
    /// Most recently received map.
    pub map: Option<Arc<dyn Map>>,
}

/// Holds the most recent artifact of each variant.
///
/// Both references live behind one mutex: the engine's callback threads
/// write, the shutdown exporter reads. A store replaces the previous
/// reference without merging; nothing else is retained.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    inner: Mutex<StoredArtifacts>,
}

impl ArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current tile manager.
    pub fn store_tile_manager(&self, tiles: Arc<dyn TileManager>) {
        self.inner.lock().tile_manager = Some(tiles);
    }

    /// Replace the current map.
    pub fn store_map(&self, map: Arc<dyn Map>) {
        self.inner.lock().map = Some(map);
    }

    /// Current tile manager, if one was received.
    pub fn tile_manager(&self) -> Option<Arc<dyn TileManager>> {
        self.inner.lock().tile_manager.clone()
    }

    /// Current map, if one was received.
    pub fn map(&self) -> Option<Arc<dyn Map>> {
        self.inner.lock().map.clone()
    }

    /// Copy both references out under a single lock acquisition.
    pub fn snapshot(&self) -> StoredArtifacts {
        self.inner.lock().clone()
    }
}
