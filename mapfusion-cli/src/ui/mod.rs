//! Terminal UI for MapFusion.
//!
//! Provides a real-time dashboard showing frame pump progress, the GPS home
//! position and the artifacts received from the mapping engine.

pub mod dashboard;

pub use dashboard::{Dashboard, DashboardConfig, DashboardEvent, DashboardSnapshot};
