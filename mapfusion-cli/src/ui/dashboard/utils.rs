//! Utility functions for the dashboard.
//!
//! This module contains formatting helpers and non-TUI output functions
//! that can be used independently of the terminal UI.

use std::time::Duration;

use mapfusion::dataset::GeoPosition;
use mapfusion::dispatch::DispatchCounts;
use mapfusion::export::{ExportOutcome, ExportReport};
use mapfusion::pump::{PumpOutcome, PumpReport, PumpStatusSnapshot};

/// Format duration as HH:MM:SS or MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let chars: Vec<_> = s.chars().collect();

    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }

    result
}

/// Format a pacing rate; non-positive means unthrottled.
pub fn format_rate(hz: f64) -> String {
    if hz.is_finite() && hz > 0.0 {
        format!("{:.0} Hz", hz)
    } else {
        "unthrottled".to_string()
    }
}

/// Format a position as `lat, lon (alt m)` with hemisphere letters.
pub fn format_position(p: &GeoPosition) -> String {
    let ns = if p.latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if p.longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.5}°{} {:.5}°{} ({:.0} m)",
        p.latitude.abs(),
        ns,
        p.longitude.abs(),
        ew,
        p.altitude
    )
}

fn describe_export(outcome: &ExportOutcome) -> String {
    match outcome {
        ExportOutcome::Skipped => "nothing to export".to_string(),
        ExportOutcome::Saved(path) => format!("saved to {}", path.display()),
        ExportOutcome::Failed { path, error } => {
            format!("FAILED ({}): {}", path.display(), error)
        }
    }
}

/// Simple non-TUI fallback for non-interactive terminals.
pub fn print_simple_status(snapshot: &PumpStatusSnapshot, artifacts: &DispatchCounts) {
    println!(
        "[{}] Pump: {} | Frames: {} grabbed, {} tracked ({:.1} fps) | Artifacts: {} tiles, {} maps",
        format_duration(snapshot.uptime),
        snapshot.state.as_str(),
        snapshot.frames_grabbed,
        snapshot.frames_tracked,
        snapshot.frames_per_second(),
        artifacts.tile_managers,
        artifacts.maps,
    );
}

/// Print final session summary.
pub fn print_session_summary(report: &PumpReport) {
    println!();
    println!("Session Summary");
    println!("───────────────");
    let outcome = match &report.outcome {
        PumpOutcome::Completed => "dataset processed".to_string(),
        PumpOutcome::Stopped => "stopped".to_string(),
        PumpOutcome::Failed(e) => format!("failed: {}", e),
    };
    println!("  Outcome: {}", outcome);
    println!(
        "  Frames: {} grabbed, {} tracked",
        format_number(report.frames_grabbed),
        format_number(report.frames_tracked)
    );
    match &report.home {
        Some(home) => println!("  Home: {}", format_position(home)),
        None => println!("  Home: not set"),
    }
    match &report.export {
        Some(ExportReport { tiles, map }) => {
            println!("  Tiles: {}", describe_export(tiles));
            println!("  Map: {}", describe_export(map));
        }
        None => println!("  Export: not run"),
    }
}
