//! Tile coverage raster.

use std::collections::BTreeSet;
use std::path::Path;

use image::{GrayImage, Luma};
use tracing::debug;

use crate::artifact::{ArtifactSaveError, TileManager};
use crate::coord::TileCoord;

/// Largest raster side written by [`CoverageTiles::save`].
pub const MAX_RASTER_DIM: u32 = 8192;

const COVERED: Luma<u8> = Luma([255]);

/// Set of Web Mercator tiles touched by at least one frame footprint.
///
/// Saved as a single-channel raster with one pixel per tile over the
/// bounding box of the coverage; the encoder is picked from the file
/// extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageTiles {
    zoom: u8,
    tiles: BTreeSet<TileCoord>,
}

impl CoverageTiles {
    /// Empty coverage at `zoom`.
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            tiles: BTreeSet::new(),
        }
    }

    /// Mark a tile as covered. Tiles at another zoom level are ignored.
    pub fn insert(&mut self, tile: TileCoord) -> bool {
        if tile.zoom != self.zoom {
            return false;
        }
        self.tiles.insert(tile)
    }

    /// Whether a tile is covered.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        self.tiles.contains(tile)
    }

    /// Covered tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileCoord> {
        self.tiles.iter()
    }

    /// Inclusive `(min_col, min_row, max_col, max_row)` of the coverage.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let first = self.tiles.iter().next()?;
        let init = (first.col, first.row, first.col, first.row);
        Some(self.tiles.iter().fold(init, |(c0, r0, c1, r1), t| {
            (c0.min(t.col), r0.min(t.row), c1.max(t.col), r1.max(t.row))
        }))
    }

    fn render(&self) -> Result<GrayImage, ArtifactSaveError> {
        let (min_col, min_row, max_col, max_row) = self
            .bounds()
            .ok_or_else(|| ArtifactSaveError::Empty("no tiles covered".to_string()))?;

        let width = max_col - min_col + 1;
        let height = max_row - min_row + 1;
        if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
            return Err(ArtifactSaveError::TooLarge {
                width,
                height,
                max: MAX_RASTER_DIM,
            });
        }

        let mut raster = GrayImage::new(width, height);
        for tile in &self.tiles {
            raster.put_pixel(tile.col - min_col, tile.row - min_row, COVERED);
        }
        Ok(raster)
    }
}

impl TileManager for CoverageTiles {
    fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError> {
        let raster = self.render()?;
        raster.save(path)?;
        debug!(
            path = %path.display(),
            width = raster.width(),
            height = raster.height(),
            "Wrote coverage raster"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tile(col: u32, row: u32) -> TileCoord {
        TileCoord { row, col, zoom: 17 }
    }

    #[test]
    fn test_insert_rejects_other_zoom() {
        let mut coverage = CoverageTiles::new(17);

        assert!(coverage.insert(tile(10, 20)));
        assert!(!coverage.insert(tile(10, 20)));
        assert!(!coverage.insert(TileCoord {
            row: 1,
            col: 1,
            zoom: 16
        }));
        assert_eq!(coverage.tile_count(), 1);
    }

    #[test]
    fn test_bounds() {
        let mut coverage = CoverageTiles::new(17);
        assert_eq!(coverage.bounds(), None);

        coverage.insert(tile(12, 40));
        coverage.insert(tile(10, 42));
        coverage.insert(tile(15, 41));

        assert_eq!(coverage.bounds(), Some((10, 40, 15, 42)));
    }

    #[test]
    fn test_save_empty_fails() {
        let temp = TempDir::new().unwrap();
        let coverage = CoverageTiles::new(17);

        let err = coverage.save(&temp.path().join("ortho.tif")).unwrap_err();

        assert!(matches!(err, ArtifactSaveError::Empty(_)));
    }

    #[test]
    fn test_save_writes_one_pixel_per_tile() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ortho.tif");
        let mut coverage = CoverageTiles::new(17);
        coverage.insert(tile(100, 200));
        coverage.insert(tile(102, 201));

        coverage.save(&path).unwrap();

        let raster = image::open(&path).unwrap().to_luma8();
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_pixel(0, 0).0, [255]);
        assert_eq!(raster.get_pixel(2, 1).0, [255]);
        assert_eq!(raster.get_pixel(1, 0).0, [0]);
    }

    #[test]
    fn test_save_rejects_oversized_raster() {
        let temp = TempDir::new().unwrap();
        let mut coverage = CoverageTiles::new(17);
        coverage.insert(tile(0, 0));
        coverage.insert(tile(MAX_RASTER_DIM, 0));

        let err = coverage.save(&temp.path().join("ortho.tif")).unwrap_err();

        assert!(matches!(err, ArtifactSaveError::TooLarge { .. }));
    }
}
