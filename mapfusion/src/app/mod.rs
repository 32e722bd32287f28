//! Application bootstrap and lifecycle management.
//!
//! This module provides the `MapperApp` type which sequences startup and
//! owns the frame pump thread.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────── main thread ──────────────────────────┐
//! │  MapperApp::start                                                │
//! │    1. reset cache directory                                      │
//! │    2. ArtifactStore + ArtifactDispatcher + ShutdownExporter      │
//! │    3. visualizer.show()                                          │
//! │    4. spawn ──────────────────────┐                              │
//! │  dashboard event loop             │                              │
//! │  gui_closed() ── stop token ──┐   │                              │
//! │  join() ◄─────────────────────┼───┼──── PumpReport               │
//! └───────────────────────────────┼───┼──────────────────────────────┘
//!                                 ▼   ▼
//!                     ┌──── frame-pump thread ────┐
//!                     │ FramePump::run            │
//!                     │   grab → validate → track │──► engine threads
//!                     │   export_all on exit      │       │
//!                     └───────────────────────────┘       ▼
//!                                                 ArtifactDispatcher
//! ```

mod bootstrap;
mod config;
mod error;
mod exit;

pub use bootstrap::{AppComponents, MapperApp, PUMP_THREAD_NAME};
pub use config::{AppConfig, ConfigOverrides};
pub use error::AppError;
pub use exit::{
    exit_code_for, exit_code_for_kind, EXIT_ABORTED, EXIT_CONFIGURATION, EXIT_EXPORT, EXIT_OK,
    EXIT_RESOURCE, EXIT_RUNTIME,
};
