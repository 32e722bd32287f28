//! Visualizer double for unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use super::Visualizer;
use crate::artifact::TileManager;
use crate::dataset::GeoPosition;

/// Calls observed by [`RecordingVisualizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum VisualizerCall {
    Show,
    SetHome(GeoPosition),
    GoHome,
    ShowTiles(usize),
}

/// Visualizer that records every call.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    calls: Mutex<Vec<VisualizerCall>>,
}

impl RecordingVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<VisualizerCall> {
        self.calls.lock().clone()
    }

    pub fn home_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, VisualizerCall::SetHome(_)))
            .count()
    }
}

impl Visualizer for RecordingVisualizer {
    fn show(&self) {
        self.calls.lock().push(VisualizerCall::Show);
    }

    fn set_home_gps_position(&self, lla: GeoPosition) {
        self.calls.lock().push(VisualizerCall::SetHome(lla));
    }

    fn go_home(&self) {
        self.calls.lock().push(VisualizerCall::GoHome);
    }

    fn show_tile_manager(&self, tiles: Arc<dyn TileManager>) {
        self.calls
            .lock()
            .push(VisualizerCall::ShowTiles(tiles.tile_count()));
    }
}
