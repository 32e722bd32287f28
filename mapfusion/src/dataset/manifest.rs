//! JSON-manifest image-sequence dataset.
//!
//! A manifest lists the frames of a flight in capture order:
//!
//! ```json
//! {
//!   "camera": { "width": 4000, "height": 3000, "fx": 2900.0, "fy": 2900.0, "cx": 2000.0, "cy": 1500.0 },
//!   "frames": [
//!     { "image": "images/DJI_0001.JPG", "timestamp": 0.0, "gps": { "lat": 48.1, "lon": 11.5, "alt": 620.0 } },
//!     { "image": "images/DJI_0002.JPG", "timestamp": 2.0 }
//!   ]
//! }
//! ```
//!
//! Image paths are relative to the manifest's directory. The dataset URI may
//! name the manifest file itself or a directory containing `manifest.json`.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::frame::{CameraDescriptor, Frame, GeoPosition};
use super::{DatasetError, DatasetSource};

/// Manifest file name looked up when the URI is a directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Deserialize)]
struct ManifestFile {
    camera: CameraDescriptor,
    #[serde(default)]
    frames: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    image: PathBuf,
    #[serde(default)]
    timestamp: Option<f64>,
    #[serde(default)]
    gps: Option<GeoPosition>,
    /// Per-frame calibration override.
    #[serde(default)]
    camera: Option<CameraDescriptor>,
}

/// Dataset reading frames listed in a JSON manifest.
#[derive(Debug, Default)]
pub struct ManifestDataset {
    root: PathBuf,
    camera: CameraDescriptor,
    entries: Vec<ManifestEntry>,
    cursor: usize,
}

impl ManifestDataset {
    /// Create an unopened dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames listed in the manifest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists no frames.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn resolve_manifest(uri: &str) -> Result<PathBuf, DatasetError> {
        let path = PathBuf::from(uri);
        if path.is_dir() {
            let manifest = path.join(MANIFEST_FILE_NAME);
            if manifest.is_file() {
                return Ok(manifest);
            }
            return Err(DatasetError::NotFound(manifest));
        }
        if path.is_file() {
            return Ok(path);
        }
        Err(DatasetError::NotFound(path))
    }

    fn load_image(&self, relative: &Path) -> DynamicImage {
        let path = self.root.join(relative);
        match image::open(&path) {
            Ok(img) => img,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to decode frame image");
                DynamicImage::new_rgb8(0, 0)
            }
        }
    }
}

impl DatasetSource for ManifestDataset {
    fn open(&mut self, uri: &str) -> Result<(), DatasetError> {
        let manifest_path = Self::resolve_manifest(uri)?;
        let content = fs::read_to_string(&manifest_path).map_err(|e| DatasetError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        let manifest: ManifestFile =
            serde_json::from_str(&content).map_err(|e| DatasetError::Parse {
                path: manifest_path.clone(),
                source: e,
            })?;

        self.root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.camera = manifest.camera;
        self.entries = manifest.frames;
        self.cursor = 0;

        info!(
            manifest = %manifest_path.display(),
            frames = self.entries.len(),
            "Opened manifest dataset"
        );
        Ok(())
    }

    fn grab_frame(&mut self) -> Option<Frame> {
        let entry = self.entries.get(self.cursor)?;
        let id = self.cursor as u64;
        self.cursor += 1;

        let image = self.load_image(&entry.image);
        let camera = entry.camera.unwrap_or(self.camera);
        let timestamp = entry.timestamp.unwrap_or(id as f64);

        debug!(frame = id, image = %entry.image.display(), "Grabbed frame");

        let mut frame = Frame::new(id, timestamp, image, camera);
        frame.gps = entry.gps;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_dataset(dir: &Path, frames_json: &str) {
        fs::create_dir_all(dir.join("images")).unwrap();
        RgbImage::new(8, 6)
            .save(dir.join("images/0001.png"))
            .unwrap();
        let manifest = format!(
            r#"{{
                "camera": {{ "width": 8, "height": 6, "fx": 7.0, "fy": 7.0, "cx": 4.0, "cy": 3.0 }},
                "frames": {}
            }}"#,
            frames_json
        );
        fs::write(dir.join(MANIFEST_FILE_NAME), manifest).unwrap();
    }

    #[test]
    fn test_open_directory_and_grab_frames() {
        let temp = TempDir::new().unwrap();
        write_dataset(
            temp.path(),
            r#"[
                { "image": "images/0001.png", "timestamp": 1.5, "gps": { "lat": 48.0, "lon": 11.0, "alt": 600.0 } },
                { "image": "images/0001.png" }
            ]"#,
        );

        let mut dataset = ManifestDataset::new();
        dataset.open(temp.path().to_str().unwrap()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = dataset.grab_frame().unwrap();
        assert_eq!(first.id, 0);
        assert_eq!(first.timestamp, 1.5);
        assert!(!first.has_empty_image());
        assert!(first.camera.is_valid());
        assert_eq!(first.gps_lla(), Some(GeoPosition::new(48.0, 11.0, 600.0)));

        let second = dataset.grab_frame().unwrap();
        assert_eq!(second.id, 1);
        assert_eq!(second.timestamp, 1.0);
        assert!(second.gps.is_none());

        assert!(dataset.grab_frame().is_none());
    }

    #[test]
    fn test_open_manifest_file_directly() {
        let temp = TempDir::new().unwrap();
        write_dataset(temp.path(), "[]");

        let mut dataset = ManifestDataset::new();
        let path = temp.path().join(MANIFEST_FILE_NAME);
        dataset.open(path.to_str().unwrap()).unwrap();

        assert!(dataset.is_empty());
        assert!(dataset.grab_frame().is_none());
    }

    #[test]
    fn test_missing_image_yields_empty_payload() {
        let temp = TempDir::new().unwrap();
        write_dataset(temp.path(), r#"[{ "image": "images/missing.png" }]"#);

        let mut dataset = ManifestDataset::new();
        dataset.open(temp.path().to_str().unwrap()).unwrap();

        let frame = dataset.grab_frame().unwrap();
        assert!(frame.has_empty_image());
    }

    #[test]
    fn test_open_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let mut dataset = ManifestDataset::new();

        let result = dataset.open(temp.path().join("nope").to_str().unwrap());
        assert!(matches!(result, Err(DatasetError::NotFound(_))));

        let result = dataset.open(temp.path().to_str().unwrap());
        assert!(matches!(result, Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn test_open_malformed_manifest_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE_NAME), "{ not json").unwrap();

        let mut dataset = ManifestDataset::new();
        let result = dataset.open(temp.path().to_str().unwrap());
        assert!(matches!(result, Err(DatasetError::Parse { .. })));
    }
}
