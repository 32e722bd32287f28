//! State types for the dashboard.
//!
//! This module contains the event, configuration and key handling types used
//! by the dashboard. They are independent of rendering and can be tested in
//! isolation.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use mapfusion::app::AppConfig;
use mapfusion::dispatch::DispatchCounts;
use mapfusion::pump::PumpStatusSnapshot;

use crate::visualizer::VisualizerStatus;

/// How long a quit confirmation stays armed.
pub const QUIT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// Spinner animation frames.
pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Events that can occur in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// User confirmed quit.
    Quit,
    /// User asked the frame pump to stop; the dashboard stays open.
    Stop,
    /// Ctrl+C: stop the pump and leave.
    Interrupt,
}

/// Static session information shown in the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub dataset: String,
    pub engine: String,
    pub rate_hz: f64,
    pub cache_dir: PathBuf,
    pub export_dir: PathBuf,
    pub stop_on_exit: bool,
}

impl DashboardConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            dataset: config
                .dataset
                .clone()
                .unwrap_or_else(|| "(not set)".to_string()),
            engine: config.engine_id.clone(),
            rate_hz: config.rate_hz,
            cache_dir: config.cache_dir.clone(),
            export_dir: config.export.directory.clone(),
            stop_on_exit: config.stop_on_gui_exit,
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub pump: PumpStatusSnapshot,
    pub artifacts: DispatchCounts,
    pub visualizer: VisualizerStatus,
    pub stop_requested: bool,
}

/// Key handling with quit confirmation.
///
/// - First 'q' or Esc: arms confirmation ([`QUIT_CONFIRM_TIMEOUT`])
/// - Second 'q' or 'y': confirms quit
/// - 'n' or Esc while armed: cancels
/// - Once the pump has terminated, 'q' quits immediately
#[derive(Debug, Default)]
pub struct InputState {
    quit_confirmation: Option<Instant>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop an expired confirmation.
    pub fn expire(&mut self, now: Instant) {
        if let Some(armed) = self.quit_confirmation {
            if now.duration_since(armed) > QUIT_CONFIRM_TIMEOUT {
                self.quit_confirmation = None;
            }
        }
    }

    /// Remaining confirmation time, if armed.
    pub fn confirmation_remaining(&self, now: Instant) -> Option<Duration> {
        self.quit_confirmation
            .map(|t| QUIT_CONFIRM_TIMEOUT.saturating_sub(now.duration_since(t)))
    }

    /// Translate a key press into an event.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        pump_terminated: bool,
        now: Instant,
    ) -> Option<DashboardEvent> {
        if modifiers.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return Some(DashboardEvent::Interrupt);
        }

        if self.quit_confirmation.is_some() {
            match code {
                KeyCode::Char('q' | 'Q' | 'y' | 'Y') => return Some(DashboardEvent::Quit),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.quit_confirmation = None,
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc if pump_terminated => {
                Some(DashboardEvent::Quit)
            }
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => {
                self.quit_confirmation = Some(now);
                None
            }
            KeyCode::Char('s' | 'S') if !pump_terminated => Some(DashboardEvent::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, c: char, terminated: bool) -> Option<DashboardEvent> {
        input.handle_key(KeyCode::Char(c), KeyModifiers::NONE, terminated, Instant::now())
    }

    #[test]
    fn test_quit_requires_confirmation_while_running() {
        let mut input = InputState::new();
        assert_eq!(press(&mut input, 'q', false), None);
        assert!(input.confirmation_remaining(Instant::now()).is_some());
        assert_eq!(press(&mut input, 'y', false), Some(DashboardEvent::Quit));
    }

    #[test]
    fn test_confirmation_cancel() {
        let mut input = InputState::new();
        press(&mut input, 'q', false);
        assert_eq!(press(&mut input, 'n', false), None);
        assert!(input.confirmation_remaining(Instant::now()).is_none());
        // A fresh 'q' re-arms instead of quitting
        assert_eq!(press(&mut input, 'q', false), None);
    }

    #[test]
    fn test_confirmation_expires() {
        let mut input = InputState::new();
        let start = Instant::now();
        input.handle_key(KeyCode::Char('q'), KeyModifiers::NONE, false, start);

        input.expire(start + QUIT_CONFIRM_TIMEOUT + Duration::from_millis(1));

        assert!(input.confirmation_remaining(start).is_none());
    }

    #[test]
    fn test_quit_immediate_after_termination() {
        let mut input = InputState::new();
        assert_eq!(press(&mut input, 'q', true), Some(DashboardEvent::Quit));
    }

    #[test]
    fn test_stop_only_while_running() {
        let mut input = InputState::new();
        assert_eq!(press(&mut input, 's', false), Some(DashboardEvent::Stop));
        assert_eq!(press(&mut input, 's', true), None);
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let mut input = InputState::new();
        let event = input.handle_key(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            false,
            Instant::now(),
        );
        assert_eq!(event, Some(DashboardEvent::Interrupt));
    }

    #[test]
    fn test_config_from_app() {
        let mut app = AppConfig::default();
        assert_eq!(DashboardConfig::from_app(&app).dataset, "(not set)");

        app.dataset = Some("/data/flight".to_string());
        let config = DashboardConfig::from_app(&app);
        assert_eq!(config.dataset, "/data/flight");
        assert_eq!(config.engine, app.engine_id);
        assert!(config.stop_on_exit);
    }
}
