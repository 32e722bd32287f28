//! Visualizer capability.
//!
//! The visualizer is optional everywhere: components hold an
//! `Option<Arc<dyn Visualizer>>` and skip the call when it is `None`.

use std::sync::Arc;

use crate::artifact::TileManager;
use crate::dataset::GeoPosition;

#[cfg(test)]
pub(crate) mod testing;

/// A display surface for mapping results.
///
/// Methods are called from the frame pump thread and from engine worker
/// threads, so implementations must be thread-safe and must not block.
pub trait Visualizer: Send + Sync {
    /// Make the visualizer visible.
    fn show(&self);

    /// Set the geodetic origin of the view.
    fn set_home_gps_position(&self, lla: GeoPosition);

    /// Center the view on the home position.
    fn go_home(&self);

    /// Display the latest tile manager.
    fn show_tile_manager(&self, tiles: Arc<dyn TileManager>);
}

/// Shared, optional visualizer handle.
pub type SharedVisualizer = Option<Arc<dyn Visualizer>>;
