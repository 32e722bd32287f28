//! TUI application module for the MapFusion CLI.
//!
//! This module contains the main-thread loops that run while the frame pump
//! works in the background, separated from argument parsing and session
//! setup.
//!
//! # Architecture
//!
//! - `run_tui()` - Interactive dashboard and event loop
//! - `run_headless()` - Periodic status lines for non-TTY environments
//!
//! Both return when the user leaves; the caller then notifies the session
//! with `MapperApp::gui_closed()` and joins the pump.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mapfusion::app::MapperApp;
use tracing::info;

use crate::error::CliError;
use crate::ui::{self, Dashboard, DashboardConfig, DashboardEvent, DashboardSnapshot};
use crate::visualizer::DashboardVisualizer;

/// Interval between headless status lines.
const HEADLESS_STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for starting the TUI application.
pub struct TuiAppConfig<'a> {
    /// The running session.
    pub app: &'a MapperApp,
    /// Raised by the Ctrl+C handler.
    pub shutdown: Arc<AtomicBool>,
    /// Visualizer state shown in the dashboard.
    pub visualizer: DashboardVisualizer,
}

fn snapshot(app: &MapperApp, visualizer: &DashboardVisualizer) -> DashboardSnapshot {
    DashboardSnapshot {
        pump: app.status().snapshot(),
        artifacts: app.dispatch_counts(),
        visualizer: visualizer.status(),
        stop_requested: app.stop_token().is_cancelled(),
    }
}

/// Run the dashboard until the user quits.
///
/// The dashboard stays open after the pump terminates so the final state
/// can be inspected; quitting is then immediate.
pub fn run_tui(config: TuiAppConfig) -> Result<(), CliError> {
    let TuiAppConfig {
        app,
        shutdown,
        visualizer,
    } = config;

    let dashboard_config = DashboardConfig::from_app(app.config());
    let mut dashboard = Dashboard::new(dashboard_config, shutdown).map_err(CliError::Dashboard)?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick: Option<Instant> = None;

    loop {
        match dashboard.poll_event().map_err(CliError::Dashboard)? {
            Some(DashboardEvent::Quit) => {
                info!("Dashboard quit by user");
                break;
            }
            Some(DashboardEvent::Interrupt) => {
                info!("Interrupted from dashboard");
                app.request_stop();
                break;
            }
            Some(DashboardEvent::Stop) => app.request_stop(),
            None => {}
        }

        if last_tick.map_or(true, |t| t.elapsed() >= tick_rate) {
            dashboard
                .draw(&snapshot(app, &visualizer))
                .map_err(CliError::Dashboard)?;
            last_tick = Some(Instant::now());
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    Ok(())
}

/// Run in headless mode (non-TTY environments).
///
/// Prints a status line periodically until the pump terminates. Ctrl+C
/// raises the stop flag, so this also returns shortly after an interrupt.
pub fn run_headless(app: &MapperApp, shutdown: &AtomicBool) -> Result<(), CliError> {
    println!("MapFusion {} running headless.", mapfusion::VERSION);
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last_status = Instant::now();
    let mut interrupted = false;

    while !app.is_finished() {
        std::thread::sleep(Duration::from_millis(100));

        if !interrupted && shutdown.load(Ordering::SeqCst) {
            println!("Stopping...");
            interrupted = true;
        }

        if last_status.elapsed() >= HEADLESS_STATUS_INTERVAL {
            ui::dashboard::print_simple_status(&app.status().snapshot(), &app.dispatch_counts());
            last_status = Instant::now();
        }
    }

    ui::dashboard::print_simple_status(&app.status().snapshot(), &app.dispatch_counts());
    Ok(())
}
