//! Callback target routing artifacts to storage and the visualizer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::store::ArtifactStore;
use crate::artifact::{Artifact, ArtifactReceiver};
use crate::visualizer::SharedVisualizer;

/// Number of artifacts received per variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchCounts {
    pub tile_managers: u64,
    pub maps: u64,
    pub unknown: u64,
}

/// Routes engine artifacts by variant.
///
/// Safe to call from any number of threads concurrently. The store's mutex
/// is the only shared mutable state written here; the visualizer is called
/// after the store update, outside the lock.
pub struct ArtifactDispatcher {
    store: Arc<ArtifactStore>,
    visualizer: SharedVisualizer,
    tile_managers: AtomicU64,
    maps: AtomicU64,
    unknown: AtomicU64,
}

impl ArtifactDispatcher {
    /// Create a dispatcher writing into `store`.
    pub fn new(store: Arc<ArtifactStore>, visualizer: SharedVisualizer) -> Self {
        Self {
            store,
            visualizer,
            tile_managers: AtomicU64::new(0),
            maps: AtomicU64::new(0),
            unknown: AtomicU64::new(0),
        }
    }

    /// The store this dispatcher writes into.
    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// Artifacts received so far.
    pub fn counts(&self) -> DispatchCounts {
        DispatchCounts {
            tile_managers: self.tile_managers.load(Ordering::Relaxed),
            maps: self.maps.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
        }
    }
}

impl ArtifactReceiver for ArtifactDispatcher {
    fn on_artifact(&self, artifact: Artifact) {
        match artifact {
            Artifact::TileManager(tiles) => {
                self.tile_managers.fetch_add(1, Ordering::Relaxed);
                debug!(
                    tiles = tiles.tile_count(),
                    zoom = tiles.zoom(),
                    "Received tile manager"
                );
                self.store.store_tile_manager(Arc::clone(&tiles));
                if let Some(vis) = &self.visualizer {
                    vis.show_tile_manager(tiles);
                }
            }
            Artifact::Map(map) => {
                self.maps.fetch_add(1, Ordering::Relaxed);
                info!(
                    kind = map.kind(),
                    frames = map.frame_count(),
                    "Got map {} with {} frames",
                    map.kind(),
                    map.frame_count()
                );
                self.store.store_map(map);
            }
            Artifact::Unknown { kind } => {
                self.unknown.fetch_add(1, Ordering::Relaxed);
                debug!(kind = %kind, "Ignoring unsupported artifact");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::testing::{MockMap, MockTileManager};
    use crate::artifact::{Map, TileManager};
    use crate::visualizer::testing::{RecordingVisualizer, VisualizerCall};
    use crate::visualizer::Visualizer;
    use std::thread;

    fn dispatcher_with_visualizer() -> (ArtifactDispatcher, Arc<RecordingVisualizer>) {
        let vis = Arc::new(RecordingVisualizer::new());
        let shared: Arc<dyn Visualizer> = vis.clone();
        let dispatcher = ArtifactDispatcher::new(Arc::new(ArtifactStore::new()), Some(shared));
        (dispatcher, vis)
    }

    #[test]
    fn test_tile_manager_is_stored_and_shown() {
        let (dispatcher, vis) = dispatcher_with_visualizer();
        let tiles: Arc<dyn TileManager> = Arc::new(MockTileManager::new("t1"));

        dispatcher.on_artifact(Artifact::TileManager(Arc::clone(&tiles)));

        let stored = dispatcher.store().tile_manager().unwrap();
        assert!(Arc::ptr_eq(&stored, &tiles));
        assert_eq!(vis.calls(), vec![VisualizerCall::ShowTiles(4)]);
        assert_eq!(dispatcher.counts().tile_managers, 1);
    }

    #[test]
    fn test_map_is_stored_without_visualizer_call() {
        let (dispatcher, vis) = dispatcher_with_visualizer();
        let map: Arc<dyn Map> = Arc::new(MockMap::new("sparse", 12));

        dispatcher.on_artifact(Artifact::Map(Arc::clone(&map)));

        let stored = dispatcher.store().map().unwrap();
        assert!(Arc::ptr_eq(&stored, &map));
        assert!(vis.calls().is_empty());
        assert_eq!(dispatcher.counts().maps, 1);
    }

    #[test]
    fn test_unknown_artifact_is_ignored() {
        let (dispatcher, vis) = dispatcher_with_visualizer();

        dispatcher.on_artifact(Artifact::Unknown {
            kind: "mesh".to_string(),
        });

        let snapshot = dispatcher.store().snapshot();
        assert!(snapshot.tile_manager.is_none());
        assert!(snapshot.map.is_none());
        assert!(vis.calls().is_empty());
        assert_eq!(dispatcher.counts().unknown, 1);
    }

    #[test]
    fn test_works_without_visualizer() {
        let dispatcher = ArtifactDispatcher::new(Arc::new(ArtifactStore::new()), None);

        dispatcher.on_artifact(Artifact::TileManager(Arc::new(MockTileManager::new("t"))));

        assert!(dispatcher.store().tile_manager().is_some());
    }

    #[test]
    fn test_later_artifact_replaces_earlier() {
        let (dispatcher, _vis) = dispatcher_with_visualizer();
        let first: Arc<dyn Map> = Arc::new(MockMap::new("first", 1));
        let second: Arc<dyn Map> = Arc::new(MockMap::new("second", 2));

        dispatcher.on_artifact(Artifact::Map(first));
        dispatcher.on_artifact(Artifact::Map(Arc::clone(&second)));

        let stored = dispatcher.store().map().unwrap();
        assert!(Arc::ptr_eq(&stored, &second));
        assert_eq!(stored.kind(), "second");
    }

    #[test]
    fn test_concurrent_delivery_from_many_threads() {
        let dispatcher = Arc::new(ArtifactDispatcher::new(
            Arc::new(ArtifactStore::new()),
            None,
        ));
        let mut handles = vec![];

        for t in 0..8 {
            let d = Arc::clone(&dispatcher);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    if (t + i) % 2 == 0 {
                        d.on_artifact(Artifact::Map(Arc::new(MockMap::new("m", i))));
                    } else {
                        d.on_artifact(Artifact::TileManager(Arc::new(MockTileManager::new(
                            "t",
                        ))));
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let counts = dispatcher.counts();
        assert_eq!(counts.maps + counts.tile_managers, 400);
        let snapshot = dispatcher.store().snapshot();
        assert!(snapshot.map.is_some());
        assert!(snapshot.tile_manager.is_some());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_last_delivered_wins(sequence in proptest::collection::vec(any::<bool>(), 1..40)) {
                let dispatcher = ArtifactDispatcher::new(Arc::new(ArtifactStore::new()), None);
                let mut last_map: Option<Arc<dyn Map>> = None;
                let mut last_tiles: Option<Arc<dyn TileManager>> = None;

                for (i, is_map) in sequence.iter().enumerate() {
                    if *is_map {
                        let map: Arc<dyn Map> = Arc::new(MockMap::new("m", i));
                        last_map = Some(Arc::clone(&map));
                        dispatcher.on_artifact(Artifact::Map(map));
                    } else {
                        let tiles: Arc<dyn TileManager> =
                            Arc::new(MockTileManager::new(&i.to_string()));
                        last_tiles = Some(Arc::clone(&tiles));
                        dispatcher.on_artifact(Artifact::TileManager(tiles));
                    }
                }

                let snapshot = dispatcher.store().snapshot();
                match (&snapshot.map, &last_map) {
                    (Some(stored), Some(expected)) => prop_assert!(Arc::ptr_eq(stored, expected)),
                    (None, None) => {}
                    _ => prop_assert!(false, "map presence mismatch"),
                }
                match (&snapshot.tile_manager, &last_tiles) {
                    (Some(stored), Some(expected)) => prop_assert!(Arc::ptr_eq(stored, expected)),
                    (None, None) => {}
                    _ => prop_assert!(false, "tile manager presence mismatch"),
                }
            }
        }
    }
}
