//! Artifact dispatch.
//!
//! The [`ArtifactDispatcher`] is the engine's callback target. It routes each
//! delivered [`Artifact`](crate::artifact::Artifact) by variant:
//!
//! ```text
//! engine worker ──► on_artifact ──┬── TileManager ──► ArtifactStore + Visualizer
//!   (any thread)                  ├── Map ─────────► ArtifactStore + log
//!                                 └── Unknown ─────► ignored
//!                                        │
//!                                        ▼
//!                                 ShutdownExporter (reads at termination)
//! ```

mod dispatcher;
mod store;

pub use dispatcher::{ArtifactDispatcher, DispatchCounts};
pub use store::{ArtifactStore, StoredArtifacts};
