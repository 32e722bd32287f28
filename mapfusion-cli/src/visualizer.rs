//! Visualizer implementation backing the terminal dashboard.
//!
//! The frame pump and engine threads call into [`DashboardVisualizer`];
//! the dashboard reads a cloned [`VisualizerStatus`] once per tick.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;

use mapfusion::artifact::TileManager;
use mapfusion::dataset::GeoPosition;
use mapfusion::visualizer::Visualizer;

/// Summary of the latest tile manager shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSummary {
    pub tiles: usize,
    pub zoom: u8,
}

/// What the visualizer has been asked to display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualizerStatus {
    /// `show()` was called.
    pub visible: bool,
    /// Geodetic origin of the view.
    pub home: Option<GeoPosition>,
    /// The view has been centered on `home`.
    pub centered: bool,
    /// Latest tile manager.
    pub latest_tiles: Option<TileSummary>,
    /// Number of tile manager updates received.
    pub tile_updates: u64,
    /// When the latest tile manager arrived.
    pub last_update: Option<Instant>,
}

/// Thread-safe visualizer recording calls for the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardVisualizer {
    status: Arc<Mutex<VisualizerStatus>>,
}

impl DashboardVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    pub fn status(&self) -> VisualizerStatus {
        self.status.lock().clone()
    }
}

impl Visualizer for DashboardVisualizer {
    fn show(&self) {
        self.status.lock().visible = true;
    }

    fn set_home_gps_position(&self, lla: GeoPosition) {
        debug!(home = %lla, "Dashboard home position set");
        let mut status = self.status.lock();
        status.home = Some(lla);
        status.centered = false;
    }

    fn go_home(&self) {
        self.status.lock().centered = true;
    }

    fn show_tile_manager(&self, tiles: Arc<dyn TileManager>) {
        let summary = TileSummary {
            tiles: tiles.tile_count(),
            zoom: tiles.zoom(),
        };
        let mut status = self.status.lock();
        status.latest_tiles = Some(summary);
        status.tile_updates += 1;
        status.last_update = Some(Instant::now());
    }
}
