//! Frame and calibration types.

use std::fmt;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Geodetic position (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude in decimal degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(alias = "lon")]
    pub longitude: f64,
    /// Altitude in meters above the ellipsoid.
    #[serde(alias = "alt", default)]
    pub altitude: f64,
}

impl GeoPosition {
    /// Create a new position.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Whether the position is a usable fix.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.altitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}, {:.6} @ {:.1}m",
            self.latitude, self.longitude, self.altitude
        )
    }
}

/// Pinhole camera calibration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraDescriptor {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Focal length along X in pixels.
    pub fx: f64,
    /// Focal length along Y in pixels.
    pub fy: f64,
    /// Principal point X in pixels.
    pub cx: f64,
    /// Principal point Y in pixels.
    pub cy: f64,
}

impl CameraDescriptor {
    /// Create a pinhole descriptor.
    pub fn pinhole(width: u32, height: u32, fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
        }
    }

    /// Whether the calibration describes a usable camera.
    ///
    /// `Default` yields an invalid descriptor.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.fx.is_finite()
            && self.fy.is_finite()
            && self.fx > 0.0
            && self.fy > 0.0
            && self.cx.is_finite()
            && self.cy.is_finite()
    }
}

/// One sensor capture.
#[derive(Clone)]
pub struct Frame {
    /// Sequence number within the dataset.
    pub id: u64,
    /// Capture time in seconds.
    pub timestamp: f64,
    /// Image payload; zero-sized when the capture could not be decoded.
    pub image: DynamicImage,
    /// Camera calibration.
    pub camera: CameraDescriptor,
    /// Geolocation, when the capture carries one.
    pub gps: Option<GeoPosition>,
}

impl Frame {
    /// Create a frame without geolocation.
    pub fn new(id: u64, timestamp: f64, image: DynamicImage, camera: CameraDescriptor) -> Self {
        Self {
            id,
            timestamp,
            image,
            camera,
            gps: None,
        }
    }

    /// Attach a geolocation.
    pub fn with_gps(mut self, gps: GeoPosition) -> Self {
        self.gps = Some(gps);
        self
    }

    /// Whether the image payload is empty.
    pub fn has_empty_image(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// The frame's GPS fix, if it has a valid one.
    pub fn gps_lla(&self) -> Option<GeoPosition> {
        self.gps.filter(GeoPosition::is_valid)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp)
            .field("image", &(self.image.width(), self.image.height()))
            .field("camera", &self.camera)
            .field("gps", &self.gps)
            .finish()
    }
}
