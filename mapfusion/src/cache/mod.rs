//! Scratch cache directory management.
//!
//! A run starts from an empty scratch directory. [`reset_cache_dir`] deletes
//! whatever a previous run left behind and recreates the directory, so that
//! by the time the engine starts the directory exists and is empty.
//!
//! Deletion is destructive: the configured path must be dedicated to
//! scratch use.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Default scratch directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// Errors from cache directory preparation.
#[derive(Debug, Error)]
pub enum CacheDirError {
    /// No path was given.
    #[error("Cache directory path is empty")]
    EmptyPath,

    /// Removing an existing entry failed.
    #[error("Failed to remove '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing a directory failed.
    #[error("Failed to read directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Recreating the directory failed.
    #[error("Failed to create '{}': {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What [`prepare_cache_dir`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The path did not exist; nothing was deleted.
    Absent,
    /// The path existed and was removed.
    Cleared {
        /// Files (and symlinks) unlinked.
        files_removed: usize,
        /// Directories removed, including the root.
        dirs_removed: usize,
    },
}

/// Remove `path` and everything beneath it.
///
/// Files are removed individually; subdirectories are emptied depth-first
/// before being removed; finally the emptied root itself is removed.
/// Symlinks are unlinked, never followed.
pub fn prepare_cache_dir(path: &Path) -> Result<PrepareOutcome, CacheDirError> {
    if path.as_os_str().is_empty() {
        return Err(CacheDirError::EmptyPath);
    }

    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PrepareOutcome::Absent),
        Err(e) => {
            return Err(CacheDirError::ReadDir {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Ok(meta) if !meta.is_dir() => {
            // A stray file where the directory should be
            fs::remove_file(path).map_err(|e| CacheDirError::Remove {
                path: path.to_path_buf(),
                source: e,
            })?;
            return Ok(PrepareOutcome::Cleared {
                files_removed: 1,
                dirs_removed: 0,
            });
        }
        Ok(_) => {}
    }

    let mut counts = (0usize, 0usize);
    remove_tree(path, &mut counts)?;

    debug!(
        path = %path.display(),
        files = counts.0,
        dirs = counts.1,
        "Removed cache directory contents"
    );

    Ok(PrepareOutcome::Cleared {
        files_removed: counts.0,
        dirs_removed: counts.1,
    })
}

fn remove_tree(dir: &Path, counts: &mut (usize, usize)) -> Result<(), CacheDirError> {
    let entries = fs::read_dir(dir).map_err(|e| CacheDirError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| CacheDirError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(|e| CacheDirError::ReadDir {
            path: entry_path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            remove_tree(&entry_path, counts)?;
        } else {
            fs::remove_file(&entry_path).map_err(|e| CacheDirError::Remove {
                path: entry_path.clone(),
                source: e,
            })?;
            counts.0 += 1;
        }
    }

    fs::remove_dir(dir).map_err(|e| CacheDirError::Remove {
        path: dir.to_path_buf(),
        source: e,
    })?;
    counts.1 += 1;

    Ok(())
}

/// Clear `path` and recreate it as an empty directory.
///
/// This is the startup operation: after it returns `Ok`, `path` exists and
/// is empty.
pub fn reset_cache_dir(path: &Path) -> Result<PrepareOutcome, CacheDirError> {
    let outcome = prepare_cache_dir(path)?;

    fs::create_dir_all(path).map_err(|e| CacheDirError::Create {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(path = %path.display(), outcome = ?outcome, "Cache directory ready");
    Ok(outcome)
}
