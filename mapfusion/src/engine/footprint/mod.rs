//! Built-in GPS footprint engine.
//!
//! The footprint engine turns geotagged frames into two artifacts:
//!
//! - [`CoverageTiles`]: the Web Mercator tiles touched by each frame's
//!   projected ground footprint
//! - [`FootprintMap`]: camera positions and footprint corners in a local
//!   east/north/up frame centered on the first fix
//!
//! Frames are processed on a worker thread spawned on the first `track`.
//! Every `publish_interval` processed frames the worker delivers a fresh
//! snapshot of both artifacts to the callback receiver. Frames left over
//! when the engine finishes are published once more. The frame's GPS
//! altitude is interpreted as height above ground.
//!
//! Each processed frame is also appended as one JSON line to
//! `footprints.jsonl` in the engine cache directory.

mod coverage;
mod map;

pub use coverage::CoverageTiles;
pub use map::{FootprintMap, MapPoint, PointKind};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{EngineSettings, MappingEngine};
use crate::artifact::{Artifact, ArtifactReceiver};
use crate::coord::{self, TileCoord, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::dataset::{Frame, GeoPosition};

/// Registry identifier of the footprint engine.
pub const FOOTPRINT_ENGINE_ID: &str = "footprint";

/// Journal file written into the cache directory.
pub const JOURNAL_FILE_NAME: &str = "footprints.jsonl";

/// Height used when a fix reports no usable altitude.
const FALLBACK_HEIGHT_M: f64 = 100.0;

/// Footprints covering more tiles than this only mark their center tile.
const MAX_TILES_PER_FRAME: u64 = 4096;

/// GPS footprint engine.
pub struct FootprintEngine {
    settings: EngineSettings,
    receiver: Option<Arc<dyn ArtifactReceiver>>,
    sender: Option<Sender<Arc<Frame>>>,
    worker: Option<JoinHandle<()>>,
}

impl FootprintEngine {
    /// Create an idle engine. The worker starts on the first frame.
    pub fn new() -> Self {
        Self {
            settings: EngineSettings::default(),
            receiver: None,
            sender: None,
            worker: None,
        }
    }

    fn spawn_worker(&mut self) -> Option<&Sender<Arc<Frame>>> {
        if self.sender.is_none() {
            let (tx, rx) = mpsc::channel();
            let worker = FootprintWorker::new(self.settings.clone(), self.receiver.clone());
            match thread::Builder::new()
                .name("footprint-engine".to_string())
                .spawn(move || worker.run(rx))
            {
                Ok(handle) => {
                    self.sender = Some(tx);
                    self.worker = Some(handle);
                }
                Err(e) => {
                    warn!(error = %e, "Failed to spawn footprint worker");
                    return None;
                }
            }
        }
        self.sender.as_ref()
    }
}

impl Default for FootprintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingEngine for FootprintEngine {
    fn version(&self) -> String {
        format!("{} {}", FOOTPRINT_ENGINE_ID, crate::VERSION)
    }

    fn set_callback(&mut self, receiver: Arc<dyn ArtifactReceiver>) {
        self.receiver = Some(receiver);
    }

    fn set_configuration(&mut self, settings: &EngineSettings) {
        self.settings = settings.clone();
        self.settings.publish_interval = self.settings.publish_interval.max(1);
        self.settings.tile_zoom = self.settings.tile_zoom.min(coord::MAX_ZOOM);
    }

    fn track(&mut self, frame: Arc<Frame>) {
        let Some(sender) = self.spawn_worker() else {
            return;
        };
        if sender.send(frame).is_err() {
            warn!("Footprint worker is gone, dropping frame");
        }
    }

    fn finish(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.sender.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Footprint worker panicked");
            }
        }
    }
}

impl Drop for FootprintEngine {
    fn drop(&mut self) {
        self.finish();
    }
}

// =============================================================================
// Worker
// =============================================================================

#[derive(Serialize)]
struct JournalEntry<'a> {
    frame: u64,
    timestamp: f64,
    position: &'a GeoPosition,
    height_m: f64,
    tiles: u64,
}

struct FootprintWorker {
    settings: EngineSettings,
    receiver: Option<Arc<dyn ArtifactReceiver>>,
    origin: Option<GeoPosition>,
    coverage: CoverageTiles,
    map: FootprintMap,
    journal: Option<BufWriter<File>>,
    processed: usize,
}

impl FootprintWorker {
    fn new(settings: EngineSettings, receiver: Option<Arc<dyn ArtifactReceiver>>) -> Self {
        let journal = open_journal(&settings.cache_dir);
        Self {
            coverage: CoverageTiles::new(settings.tile_zoom),
            settings,
            receiver,
            origin: None,
            map: FootprintMap::new(),
            journal,
            processed: 0,
        }
    }

    fn run(mut self, frames: Receiver<Arc<Frame>>) {
        debug!(zoom = self.settings.tile_zoom, "Footprint worker started");
        for frame in frames {
            self.process(&frame);
        }
        if self.processed % self.settings.publish_interval != 0 {
            self.publish();
        }
        if let Some(journal) = self.journal.as_mut() {
            if let Err(e) = journal.flush() {
                warn!(error = %e, "Footprint journal flush failed");
            }
        }
        debug!(processed = self.processed, "Footprint worker stopped");
    }

    fn process(&mut self, frame: &Frame) {
        let Some(fix) = frame.gps_lla() else {
            debug!(frame = frame.id, "Frame has no GPS fix, skipping");
            return;
        };
        let origin = *self.origin.get_or_insert(fix);

        let footprint = Footprint::project(frame, &fix);
        let tiles = self.mark_tiles(&footprint);
        self.map.add_frame(footprint.points(&origin, &fix));
        self.processed += 1;

        if let Some(journal) = self.journal.as_mut() {
            let entry = JournalEntry {
                frame: frame.id,
                timestamp: frame.timestamp,
                position: &fix,
                height_m: footprint.height_m,
                tiles,
            };
            match serde_json::to_string(&entry) {
                Ok(line) => {
                    if let Err(e) = writeln!(journal, "{}", line) {
                        warn!(error = %e, "Footprint journal write failed, disabling journal");
                        self.journal = None;
                    }
                }
                Err(e) => warn!(frame = frame.id, error = %e, "Cannot serialize journal entry"),
            }
        }

        if self.processed % self.settings.publish_interval == 0 {
            self.publish();
        }
    }

    fn mark_tiles(&mut self, footprint: &Footprint) -> u64 {
        let zoom = self.settings.tile_zoom;
        let (Ok(nw), Ok(se)) = (
            coord::to_tile_coords(footprint.north, footprint.west, zoom),
            coord::to_tile_coords(footprint.south, footprint.east, zoom),
        ) else {
            return 0;
        };

        let count = (se.col - nw.col + 1) as u64 * (se.row - nw.row + 1) as u64;
        if count > MAX_TILES_PER_FRAME {
            debug!(tiles = count, "Footprint too large, marking center tile only");
            let center = TileCoord {
                row: nw.row + (se.row - nw.row) / 2,
                col: nw.col + (se.col - nw.col) / 2,
                zoom,
            };
            self.coverage.insert(center);
            return 1;
        }

        for row in nw.row..=se.row {
            for col in nw.col..=se.col {
                self.coverage.insert(TileCoord { row, col, zoom });
            }
        }
        count
    }

    fn publish(&self) {
        let Some(receiver) = &self.receiver else {
            return;
        };
        info!(
            frames = self.processed,
            tiles = self.coverage.tiles().count(),
            "Publishing footprint artifacts"
        );
        receiver.on_artifact(Artifact::TileManager(Arc::new(self.coverage.clone())));
        receiver.on_artifact(Artifact::Map(Arc::new(self.map.clone())));
    }
}

fn open_journal(cache_dir: &Path) -> Option<BufWriter<File>> {
    let path = cache_dir.join(JOURNAL_FILE_NAME);
    let result = fs::create_dir_all(cache_dir).and_then(|_| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    });
    match result {
        Ok(file) => Some(BufWriter::new(file)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot open footprint journal");
            None
        }
    }
}

// =============================================================================
// Footprint geometry
// =============================================================================

/// Ground rectangle seen by a nadir camera, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Footprint {
    north: f64,
    south: f64,
    west: f64,
    east: f64,
    height_m: f64,
    half_width_m: f64,
    half_height_m: f64,
}

impl Footprint {
    fn project(frame: &Frame, fix: &GeoPosition) -> Self {
        let height_m = if fix.altitude.is_finite() && fix.altitude > 0.0 {
            fix.altitude
        } else {
            FALLBACK_HEIGHT_M
        };

        let cam = &frame.camera;
        let half_width_m = height_m * (cam.width as f64 / 2.0) / cam.fx;
        let half_height_m = height_m * (cam.height as f64 / 2.0) / cam.fy;

        let dlat = (half_height_m / EARTH_RADIUS_M).to_degrees();
        let cos_lat = fix.latitude.to_radians().cos().max(1e-6);
        let dlon = (half_width_m / (EARTH_RADIUS_M * cos_lat)).to_degrees();

        Self {
            north: (fix.latitude + dlat).clamp(MIN_LAT, MAX_LAT),
            south: (fix.latitude - dlat).clamp(MIN_LAT, MAX_LAT),
            west: (fix.longitude - dlon).clamp(MIN_LON, MAX_LON),
            east: (fix.longitude + dlon).clamp(MIN_LON, MAX_LON),
            height_m,
            half_width_m,
            half_height_m,
        }
    }

    /// Camera center and the four ground corners relative to `origin`.
    fn points(&self, origin: &GeoPosition, fix: &GeoPosition) -> [MapPoint; 5] {
        let (east, north) =
            coord::local_offset_m(origin.latitude, origin.longitude, fix.latitude, fix.longitude);
        let corner = |de: f64, dn: f64| MapPoint {
            east: east + de,
            north: north + dn,
            up: 0.0,
            kind: PointKind::Ground,
        };
        let (w, h) = (self.half_width_m, self.half_height_m);

        [
            MapPoint {
                east,
                north,
                up: self.height_m,
                kind: PointKind::Camera,
            },
            corner(-w, h),
            corner(w, h),
            corner(w, -h),
            corner(-w, -h),
        ]
    }
}
