//! Footprint point map.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::artifact::{ArtifactSaveError, Map};

/// Map kind reported by [`FootprintMap`].
pub const FOOTPRINT_MAP_KIND: &str = "footprint";

/// Role of a map point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// Camera position at capture time.
    Camera,
    /// Corner of the projected ground footprint.
    Ground,
}

impl PointKind {
    fn color(self) -> [u8; 3] {
        match self {
            PointKind::Camera => [255, 64, 64],
            PointKind::Ground => [200, 200, 200],
        }
    }
}

/// A point in the local east/north/up frame, meters from home.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub east: f64,
    pub north: f64,
    pub up: f64,
    pub kind: PointKind,
}

/// Sparse map of camera positions and footprint corners.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FootprintMap {
    points: Vec<MapPoint>,
    frames: usize,
}

impl FootprintMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the points contributed by one frame.
    pub fn add_frame(&mut self, points: impl IntoIterator<Item = MapPoint>) {
        self.points.extend(points);
        self.frames += 1;
    }

    /// All points.
    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    fn write_ply<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "ply")?;
        writeln!(out, "format ascii 1.0")?;
        writeln!(out, "comment frames {}", self.frames)?;
        writeln!(out, "element vertex {}", self.points.len())?;
        writeln!(out, "property float x")?;
        writeln!(out, "property float y")?;
        writeln!(out, "property float z")?;
        writeln!(out, "property uchar red")?;
        writeln!(out, "property uchar green")?;
        writeln!(out, "property uchar blue")?;
        writeln!(out, "end_header")?;

        for p in &self.points {
            let [r, g, b] = p.kind.color();
            writeln!(
                out,
                "{:.3} {:.3} {:.3} {} {} {}",
                p.east, p.north, p.up, r, g, b
            )?;
        }
        out.flush()
    }
}

impl Map for FootprintMap {
    fn kind(&self) -> &str {
        FOOTPRINT_MAP_KIND
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn save(&self, path: &Path) -> Result<(), ArtifactSaveError> {
        if self.points.is_empty() {
            return Err(ArtifactSaveError::Empty("map has no points".to_string()));
        }

        let mut out = BufWriter::new(File::create(path)?);
        self.write_ply(&mut out)?;
        debug!(path = %path.display(), points = self.points.len(), "Wrote PLY map");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn camera(east: f64) -> MapPoint {
        MapPoint {
            east,
            north: 0.0,
            up: 100.0,
            kind: PointKind::Camera,
        }
    }

    #[test]
    fn test_frame_count_tracks_added_frames() {
        let mut map = FootprintMap::new();
        map.add_frame([camera(0.0)]);
        map.add_frame([camera(1.0), camera(2.0)]);

        assert_eq!(map.frame_count(), 2);
        assert_eq!(map.points().len(), 3);
        assert_eq!(map.kind(), "footprint");
    }

    #[test]
    fn test_save_empty_fails() {
        let temp = TempDir::new().unwrap();

        let err = FootprintMap::new()
            .save(&temp.path().join("sparse.ply"))
            .unwrap_err();

        assert!(matches!(err, ArtifactSaveError::Empty(_)));
    }

    #[test]
    fn test_save_writes_ascii_ply() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sparse.ply");
        let mut map = FootprintMap::new();
        map.add_frame([
            camera(1.5),
            MapPoint {
                east: -2.0,
                north: 3.0,
                up: 0.0,
                kind: PointKind::Ground,
            },
        ]);

        map.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ply");
        assert!(lines.contains(&"element vertex 2"));
        let body: Vec<&str> = content
            .split("end_header\n")
            .nth(1)
            .unwrap()
            .lines()
            .collect();
        assert_eq!(body, vec!["1.500 0.000 100.000 255 64 64", "-2.000 3.000 0.000 200 200 200"]);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let mut map = FootprintMap::new();
        map.add_frame([camera(0.0)]);

        let err = map.save(&temp.path().join("nope/sparse.ply")).unwrap_err();

        assert!(matches!(err, ArtifactSaveError::Io(_)));
    }
}
