//! Frame pump.
//!
//! The [`FramePump`] runs on a dedicated thread. It opens the dataset, loads
//! the engine, then paces a loop that grabs, validates and tracks one frame
//! per tick until the dataset ends, the stop token is cancelled, or a frame
//! is rejected. On termination it runs the [`ShutdownExporter`] exactly once.
//!
//! [`ShutdownExporter`]: crate::export::ShutdownExporter

mod error;
mod frame_pump;
mod rate;
mod status;

pub use error::{ErrorKind, PumpError};
pub use frame_pump::{FramePump, PumpConfig, PumpOutcome, PumpReport, DEFAULT_RATE_HZ};
pub use rate::Rate;
pub use status::{PumpEnd, PumpState, PumpStatusSnapshot, SharedPumpStatus};
