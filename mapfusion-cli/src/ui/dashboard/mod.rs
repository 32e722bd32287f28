//! Main TUI dashboard for MapFusion.
//!
//! Displays frame pump progress, the home position and received artifacts.
//!
//! # Module Structure
//!
//! - `state` - Events, configuration and key handling (no rendering dependencies)
//! - `render` - Layout and section rendering
//! - `utils` - Formatting and non-TUI output

mod render;
pub mod state;
pub mod utils;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mapfusion::pump::PumpState;
use ratatui::{backend::CrosstermBackend, Terminal};

pub use state::{
    DashboardConfig, DashboardEvent, DashboardSnapshot, InputState, QUIT_CONFIRM_TIMEOUT,
    SPINNER_FRAMES,
};
pub use utils::{print_session_summary, print_simple_status};

/// The main dashboard UI.
pub struct Dashboard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: DashboardConfig,
    shutdown: Arc<AtomicBool>,
    input: InputState,
    spinner_frame: usize,
    pump_terminated: bool,
}

impl Dashboard {
    /// Take over the terminal.
    pub fn new(config: DashboardConfig, shutdown: Arc<AtomicBool>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            config,
            shutdown,
            input: InputState::new(),
            spinner_frame: 0,
            pump_terminated: false,
        })
    }

    /// Restore terminal to normal state.
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the dashboard.
    pub fn draw(&mut self, snapshot: &DashboardSnapshot) -> io::Result<()> {
        self.pump_terminated = snapshot.pump.state == PumpState::Terminated;
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        let spinner = SPINNER_FRAMES[self.spinner_frame];
        let confirmation_remaining = self.input.confirmation_remaining(Instant::now());
        let config = &self.config;

        self.terminal.draw(|frame| {
            render::render_ui(frame, config, snapshot, confirmation_remaining, spinner);
        })?;

        Ok(())
    }

    /// Check for events (non-blocking).
    ///
    /// A raised shutdown flag (SIGINT outside raw mode) reads as an interrupt.
    pub fn poll_event(&mut self) -> io::Result<Option<DashboardEvent>> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(Some(DashboardEvent::Interrupt));
        }

        let now = Instant::now();
        self.input.expire(now);

        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.input.handle_key(
                        key.code,
                        key.modifiers,
                        self.pump_terminated,
                        now,
                    ));
                }
            }
        }

        Ok(None)
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
