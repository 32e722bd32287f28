//! Lock-free pump progress shared with the dashboard.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use crate::dataset::GeoPosition;

/// Pump lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Idle,
    Running,
    Terminated,
}

impl PumpState {
    /// Returns a string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpState::Idle => "idle",
            PumpState::Running => "running",
            PumpState::Terminated => "terminated",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => PumpState::Running,
            2 => PumpState::Terminated,
            _ => PumpState::Idle,
        }
    }
}

/// How a terminated pump ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpEnd {
    /// The dataset ran out of frames.
    Completed,
    /// The stop flag was raised.
    Stopped,
    /// A fatal error ended the run.
    Failed,
}

impl PumpEnd {
    /// Returns a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpEnd::Completed => "dataset processed",
            PumpEnd::Stopped => "stopped",
            PumpEnd::Failed => "failed",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            PumpEnd::Completed => 1,
            PumpEnd::Stopped => 2,
            PumpEnd::Failed => 3,
        }
    }

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(PumpEnd::Completed),
            2 => Some(PumpEnd::Stopped),
            3 => Some(PumpEnd::Failed),
            _ => None,
        }
    }
}

/// A point-in-time view of the pump.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpStatusSnapshot {
    pub state: PumpState,
    pub end: Option<PumpEnd>,
    pub frames_grabbed: u64,
    pub frames_tracked: u64,
    pub home: Option<GeoPosition>,
    pub uptime: Duration,
}

impl PumpStatusSnapshot {
    /// Tracked frames per second of uptime.
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.frames_tracked as f64 / secs
        } else {
            0.0
        }
    }
}

/// Pump progress counters, written by the pump thread.
#[derive(Debug)]
pub struct SharedPumpStatus {
    state: AtomicU8,
    end: AtomicU8,
    frames_grabbed: AtomicU64,
    frames_tracked: AtomicU64,
    has_home: AtomicBool,
    home_lat: AtomicU64,
    home_lon: AtomicU64,
    home_alt: AtomicU64,
    start_time: Instant,
}

impl Default for SharedPumpStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedPumpStatus {
    /// Idle status with zeroed counters.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(0),
            end: AtomicU8::new(0),
            frames_grabbed: AtomicU64::new(0),
            frames_tracked: AtomicU64::new(0),
            has_home: AtomicBool::new(false),
            home_lat: AtomicU64::new(0),
            home_lon: AtomicU64::new(0),
            home_alt: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub(crate) fn mark_running(&self) {
        self.state.store(1, Ordering::Release);
    }

    pub(crate) fn mark_terminated(&self, end: PumpEnd) {
        self.end.store(end.to_u8(), Ordering::Relaxed);
        self.state.store(2, Ordering::Release);
    }

    pub(crate) fn frame_grabbed(&self) {
        self.frames_grabbed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn frame_tracked(&self) {
        self.frames_tracked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_home(&self, home: &GeoPosition) {
        self.home_lat.store(home.latitude.to_bits(), Ordering::Relaxed);
        self.home_lon.store(home.longitude.to_bits(), Ordering::Relaxed);
        self.home_alt.store(home.altitude.to_bits(), Ordering::Relaxed);
        self.has_home.store(true, Ordering::Release);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PumpState {
        PumpState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the pump has terminated.
    pub fn is_terminated(&self) -> bool {
        self.state() == PumpState::Terminated
    }

    /// Get a snapshot of current progress.
    pub fn snapshot(&self) -> PumpStatusSnapshot {
        let home = self.has_home.load(Ordering::Acquire).then(|| {
            GeoPosition::new(
                f64::from_bits(self.home_lat.load(Ordering::Relaxed)),
                f64::from_bits(self.home_lon.load(Ordering::Relaxed)),
                f64::from_bits(self.home_alt.load(Ordering::Relaxed)),
            )
        });

        PumpStatusSnapshot {
            state: self.state(),
            end: PumpEnd::from_u8(self.end.load(Ordering::Relaxed)),
            frames_grabbed: self.frames_grabbed.load(Ordering::Relaxed),
            frames_tracked: self.frames_tracked.load(Ordering::Relaxed),
            home,
            uptime: self.start_time.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot() {
        let status = SharedPumpStatus::new();
        let snapshot = status.snapshot();

        assert_eq!(snapshot.state, PumpState::Idle);
        assert_eq!(snapshot.end, None);
        assert_eq!(snapshot.frames_grabbed, 0);
        assert_eq!(snapshot.home, None);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let status = SharedPumpStatus::new();

        status.mark_running();
        assert_eq!(status.state(), PumpState::Running);
        assert!(!status.is_terminated());

        status.mark_terminated(PumpEnd::Stopped);
        let snapshot = status.snapshot();
        assert_eq!(snapshot.state, PumpState::Terminated);
        assert_eq!(snapshot.end, Some(PumpEnd::Stopped));
    }

    #[test]
    fn test_home_round_trips_through_atomics() {
        let status = SharedPumpStatus::new();
        let home = GeoPosition::new(48.137154, 11.576124, 519.5);

        status.set_home(&home);

        assert_eq!(status.snapshot().home, Some(home));
    }

    #[test]
    fn test_counters() {
        let status = SharedPumpStatus::new();
        status.frame_grabbed();
        status.frame_grabbed();
        status.frame_tracked();

        let snapshot = status.snapshot();
        assert_eq!(snapshot.frames_grabbed, 2);
        assert_eq!(snapshot.frames_tracked, 1);
    }
}
