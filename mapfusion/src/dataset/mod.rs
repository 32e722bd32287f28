//! Dataset sources.
//!
//! A [`DatasetSource`] produces [`Frame`]s on demand, in capture order. The
//! frame pump opens it once and then pulls one frame per tick until the
//! source reports end of stream.
//!
//! [`ManifestDataset`] is the bundled implementation: an image sequence
//! described by a JSON manifest.

mod frame;
mod manifest;

pub use frame::{CameraDescriptor, Frame, GeoPosition};
pub use manifest::{ManifestDataset, MANIFEST_FILE_NAME};

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset path does not exist.
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the dataset description failed.
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset description is malformed.
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Any other failure reported by a source implementation.
    #[error("{0}")]
    Other(String),
}

/// A source of frames.
pub trait DatasetSource: Send {
    /// Open the dataset at `uri`.
    fn open(&mut self, uri: &str) -> Result<(), DatasetError>;

    /// Return the next frame, or `None` at end of stream.
    ///
    /// May block on I/O.
    fn grab_frame(&mut self) -> Option<Frame>;
}

impl<T: DatasetSource + ?Sized> DatasetSource for Box<T> {
    fn open(&mut self, uri: &str) -> Result<(), DatasetError> {
        (**self).open(uri)
    }

    fn grab_frame(&mut self) -> Option<Frame> {
        (**self).grab_frame()
    }
}
