//! Main dashboard rendering.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (3 lines)                                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Session (4 lines)                                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Frame Pump (5 lines)                                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ Home Position (4 lines)                                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ Artifacts (5 lines)                                     │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use mapfusion::pump::{PumpEnd, PumpState, PumpStatusSnapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{DashboardConfig, DashboardSnapshot};
use super::utils::{format_duration, format_number, format_position, format_rate};

/// Render the dashboard UI to the frame.
pub fn render_ui(
    frame: &mut Frame,
    config: &DashboardConfig,
    snapshot: &DashboardSnapshot,
    confirmation_remaining: Option<Duration>,
    spinner: char,
) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Session
            Constraint::Length(5), // Frame Pump
            Constraint::Length(4), // Home Position
            Constraint::Length(5), // Artifacts
            Constraint::Min(0),    // Padding
        ])
        .split(size);

    render_header(frame, chunks[0], &snapshot.pump, snapshot.stop_requested);
    render_session(frame, chunks[1], config);
    render_pump(frame, chunks[2], &snapshot.pump, snapshot.stop_requested, spinner);
    render_home(frame, chunks[3], snapshot);
    render_artifacts(frame, chunks[4], snapshot);

    if let Some(remaining) = confirmation_remaining {
        render_quit_confirmation(frame, size, remaining, config.stop_on_exit);
    }
}

/// Area inside a block with the given margins.
pub fn inner_rect(area: Rect, margin_x: u16, margin_y: u16) -> Rect {
    Rect {
        x: area.x + margin_x,
        y: area.y + margin_y,
        width: area.width.saturating_sub(margin_x * 2),
        height: area.height.saturating_sub(margin_y * 2),
    }
}

fn section_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color),
        ))
}

fn label(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

/// Render the header bar with uptime and key hints.
fn render_header(frame: &mut Frame, area: Rect, pump: &PumpStatusSnapshot, stop_requested: bool) {
    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" MapFusion {} ", mapfusion::VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left);

    let mut spans = vec![
        label("Uptime: "),
        Span::styled(format_duration(pump.uptime), Style::default().fg(Color::White)),
        label("  │  Press "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        label(" to quit"),
    ];
    if pump.state != PumpState::Terminated && !stop_requested {
        spans.push(label(", "));
        spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
        spans.push(label(" to stop the pump"));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(header_block)
        .alignment(Alignment::Right);

    frame.render_widget(paragraph, area);
}

fn render_session(frame: &mut Frame, area: Rect, config: &DashboardConfig) {
    frame.render_widget(section_block("Session", Color::Blue), area);
    let inner = inner_rect(area, 1, 1);

    let text = vec![
        Line::from(vec![
            label("Dataset: "),
            Span::styled(config.dataset.as_str(), Style::default().fg(Color::White)),
            label("   Engine: "),
            Span::styled(config.engine.as_str(), Style::default().fg(Color::Green)),
            label("   Rate: "),
            Span::styled(format_rate(config.rate_hz), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            label("Cache:   "),
            Span::styled(
                config.cache_dir.display().to_string(),
                Style::default().fg(Color::White),
            ),
            label("   Export: "),
            Span::styled(
                config.export_dir.display().to_string(),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(text), inner);
}

/// State indicator, text and color for the pump.
fn pump_state_display(pump: &PumpStatusSnapshot, stop_requested: bool) -> (&'static str, Color) {
    match (pump.state, pump.end) {
        (PumpState::Idle, _) => ("Starting", Color::Yellow),
        (PumpState::Running, _) if stop_requested => ("Stopping", Color::Yellow),
        (PumpState::Running, _) => ("Running", Color::Green),
        (PumpState::Terminated, Some(PumpEnd::Completed)) => ("Dataset processed", Color::Cyan),
        (PumpState::Terminated, Some(PumpEnd::Stopped)) => ("Stopped", Color::Cyan),
        (PumpState::Terminated, _) => ("Failed (see log)", Color::Red),
    }
}

fn render_pump(
    frame: &mut Frame,
    area: Rect,
    pump: &PumpStatusSnapshot,
    stop_requested: bool,
    spinner: char,
) {
    frame.render_widget(section_block("Frame Pump", Color::Yellow), area);
    let inner = inner_rect(area, 1, 1);

    let (state_text, state_color) = pump_state_display(pump, stop_requested);
    let indicator = if pump.state == PumpState::Running {
        format!("{} ", spinner)
    } else {
        "● ".to_string()
    };

    let text = vec![
        Line::from(vec![
            label("State:   "),
            Span::styled(indicator, Style::default().fg(state_color)),
            Span::styled(
                state_text,
                Style::default()
                    .fg(state_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            label("Frames:  "),
            Span::styled(
                format_number(pump.frames_grabbed),
                Style::default().fg(Color::White),
            ),
            label(" grabbed, "),
            Span::styled(
                format_number(pump.frames_tracked),
                Style::default().fg(Color::White),
            ),
            label(" tracked"),
        ]),
        Line::from(vec![
            label("Throughput: "),
            Span::styled(
                format!("{:.1} fps", pump.frames_per_second()),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(text), inner);
}

fn render_home(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    frame.render_widget(section_block("Home Position", Color::Magenta), area);
    let inner = inner_rect(area, 1, 1);

    let home = snapshot.visualizer.home.or(snapshot.pump.home);
    let position_line = match home {
        Some(p) => Line::from(vec![
            label("GPS home: "),
            Span::styled(format_position(&p), Style::default().fg(Color::Green)),
        ]),
        None => Line::from(vec![
            label("GPS home: "),
            Span::styled(
                "Waiting for the first frame...",
                Style::default().fg(Color::Yellow),
            ),
        ]),
    };

    let view_line = Line::from(vec![
        label("View:     "),
        if snapshot.visualizer.centered {
            Span::styled("centered on home", Style::default().fg(Color::White))
        } else {
            Span::styled("not centered", Style::default().fg(Color::DarkGray))
        },
    ]);

    frame.render_widget(Paragraph::new(vec![position_line, view_line]), inner);
}

fn render_artifacts(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Artifacts ", Style::default().fg(Color::Blue)));
    frame.render_widget(block, area);
    let inner = inner_rect(area, 1, 1);

    let counts = &snapshot.artifacts;
    let latest = match snapshot.visualizer.latest_tiles {
        Some(t) => format!("   latest: {} tiles @ z{}", format_number(t.tiles as u64), t.zoom),
        None => String::new(),
    };

    let mut text = vec![
        Line::from(vec![
            label("Tile managers: "),
            Span::styled(
                format_number(counts.tile_managers),
                Style::default().fg(Color::White),
            ),
            Span::styled(latest, Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            label("Maps:          "),
            Span::styled(format_number(counts.maps), Style::default().fg(Color::White)),
        ]),
    ];
    if counts.unknown > 0 {
        text.push(Line::from(vec![
            label("Ignored:       "),
            Span::styled(
                format_number(counts.unknown),
                Style::default().fg(Color::Yellow),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(text), inner);
}

/// Render the quit confirmation overlay banner.
pub fn render_quit_confirmation(
    frame: &mut Frame,
    area: Rect,
    remaining: Duration,
    stop_on_exit: bool,
) {
    let banner_width = 60u16;
    let banner_height = 5u16;
    let x = area.x + (area.width.saturating_sub(banner_width)) / 2;
    let y = area.y + 4;

    let banner_area = Rect {
        x,
        y,
        width: banner_width.min(area.width),
        height: banner_height.min(area.height.saturating_sub(y)),
    };

    let clear_block = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(clear_block, banner_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black))
        .title(Span::styled(
            " ⚠ Confirm Quit ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let warning = if stop_on_exit {
        "Quitting stops the frame pump and exports the results."
    } else {
        "The frame pump keeps running until the dataset ends."
    };

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let text = vec![
        Line::from(vec![Span::styled(
            warning,
            Style::default().fg(Color::Yellow),
        )]),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::White)),
            key("y", Color::Green),
            Span::styled(" or ", Style::default().fg(Color::White)),
            key("q", Color::Green),
            Span::styled(" to quit, ", Style::default().fg(Color::White)),
            key("n", Color::Cyan),
            Span::styled(" or ", Style::default().fg(Color::White)),
            key("Esc", Color::Cyan),
            Span::styled(" to cancel", Style::default().fg(Color::White)),
            Span::styled(
                format!("  ({}s)", remaining.as_secs()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, banner_area);
}
