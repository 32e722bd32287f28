//! Frame pump errors.

use std::fmt;

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::engine::EngineError;

/// Error category, used for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required configuration is missing.
    Configuration,
    /// Dataset or engine could not be opened.
    ResourceOpen,
    /// A frame failed validation.
    FrameValidation,
    /// The first frame could not initialize the run.
    Initialization,
}

impl ErrorKind {
    /// Returns a string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::ResourceOpen => "resource-open",
            ErrorKind::FrameValidation => "frame-validation",
            ErrorKind::Initialization => "initialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal pump errors. Each one terminates the pump.
#[derive(Debug, Error)]
pub enum PumpError {
    #[error("No dataset configured")]
    NoDataset,

    #[error("Failed to open dataset '{uri}': {source}")]
    DatasetOpen {
        uri: String,
        #[source]
        source: DatasetError,
    },

    #[error("Failed to load engine: {0}")]
    EngineLoad(#[from] EngineError),

    #[error("Frame {frame} has an empty image")]
    EmptyImage { frame: u64 },

    #[error("Frame {frame} has an invalid camera")]
    InvalidCamera { frame: u64 },

    #[error("No GPS information on first frame {frame}")]
    NoGps { frame: u64 },
}

impl PumpError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PumpError::NoDataset => ErrorKind::Configuration,
            PumpError::DatasetOpen { .. } | PumpError::EngineLoad(_) => ErrorKind::ResourceOpen,
            PumpError::EmptyImage { .. } | PumpError::InvalidCamera { .. } => {
                ErrorKind::FrameValidation
            }
            PumpError::NoGps { .. } => ErrorKind::Initialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(PumpError::NoDataset.kind(), ErrorKind::Configuration);
        assert_eq!(
            PumpError::DatasetOpen {
                uri: "x".to_string(),
                source: DatasetError::Other("bad".to_string()),
            }
            .kind(),
            ErrorKind::ResourceOpen
        );
        assert_eq!(
            PumpError::EngineLoad(EngineError::Unknown {
                id: "x".to_string(),
                available: String::new(),
            })
            .kind(),
            ErrorKind::ResourceOpen
        );
        assert_eq!(PumpError::EmptyImage { frame: 0 }.kind(), ErrorKind::FrameValidation);
        assert_eq!(PumpError::InvalidCamera { frame: 0 }.kind(), ErrorKind::FrameValidation);
        assert_eq!(PumpError::NoGps { frame: 0 }.kind(), ErrorKind::Initialization);
    }

    #[test]
    fn test_messages() {
        assert_eq!(PumpError::NoDataset.to_string(), "No dataset configured");
        assert_eq!(
            PumpError::NoGps { frame: 3 }.to_string(),
            "No GPS information on first frame 3"
        );
    }
}
