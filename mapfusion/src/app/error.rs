//! Application error types.

use std::fmt;
use std::io;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to spawn the frame pump thread.
    ThreadSpawn(io::Error),

    /// The frame pump thread panicked.
    PumpPanicked(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ThreadSpawn(e) => {
                write!(f, "Failed to spawn frame pump thread: {}", e)
            }
            AppError::PumpPanicked(msg) => {
                write!(f, "Frame pump panicked: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::ThreadSpawn(e) => Some(e),
            AppError::PumpPanicked(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_app_error_display() {
        let err = AppError::PumpPanicked("boom".to_string());
        assert_eq!(err.to_string(), "Frame pump panicked: boom");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_thread_spawn_has_source() {
        let err = AppError::ThreadSpawn(io::Error::new(io::ErrorKind::Other, "no threads"));
        assert!(err.to_string().contains("no threads"));
        assert!(err.source().is_some());
    }
}
