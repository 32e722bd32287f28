//! Coordinate types for Web Mercator tiles.

use std::fmt;

use thiserror::Error;

/// Maximum latitude supported by Web Mercator projection.
pub const MAX_LAT: f64 = 85.05112878;
/// Minimum latitude supported by Web Mercator projection.
pub const MIN_LAT: f64 = -85.05112878;
/// Minimum longitude.
pub const MIN_LON: f64 = -180.0;
/// Maximum longitude.
pub const MAX_LON: f64 = 180.0;
/// Deepest zoom level the coverage tiles are computed at.
pub const MAX_ZOOM: u8 = 22;

/// A Web Mercator tile at a given zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Tile row (Y), counted from the north.
    pub row: u32,
    /// Tile column (X), counted from the antimeridian.
    pub col: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Errors from coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Latitude {0} out of range (-85.05112878 to 85.05112878)")]
    InvalidLatitude(f64),

    #[error("Longitude {0} out of range (-180 to 180)")]
    InvalidLongitude(f64),

    #[error("Zoom level {0} exceeds maximum of 22")]
    InvalidZoom(u8),
}
