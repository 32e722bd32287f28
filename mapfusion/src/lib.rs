//! MapFusion - real-time aerial mapping shell
//!
//! This library coordinates a dataset reader, a mapping engine and a
//! visualizer: frames are pumped into the engine on a background thread,
//! artifacts come back asynchronously through a callback, and the latest
//! tile set and map are exported when the run ends.

pub mod app;
pub mod artifact;
pub mod cache;
pub mod config;
pub mod coord;
pub mod dataset;
pub mod dispatch;
pub mod engine;
pub mod export;
pub mod logging;
pub mod pump;
pub mod visualizer;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
