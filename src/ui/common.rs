//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::chart::ChartId;

/// Render the header bar with the refresh state of both flows.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let flow_span = |label: &str, live: bool, error: &Option<String>| {
        let style = if error.is_some() {
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
        } else if live {
            Style::default().fg(app.theme.healthy)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        Span::styled(format!("● {}", label), style)
    };

    let line = Line::from(vec![
        Span::styled(" BANWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        flow_span(
            "metrics",
            app.charts.is_live(ChartId::CpuRam),
            &app.metrics_error,
        ),
        Span::raw(" "),
        flow_span("bans", app.charts.is_live(ChartId::Bans), &app.bans_error),
        Span::raw(" │ "),
        Span::raw(app.source_description().to_string()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:System "),
        Line::from(" 3:Bans "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::System => 1,
        View::Bans => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the last per-flow error if any, otherwise the bucket position and
/// available controls. Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(err) = app.metrics_error.as_deref().or(app.bans_error.as_deref()) {
        let paragraph = Paragraph::new(format!(" Error: {} (showing last good data)", err))
            .style(Style::default().fg(app.theme.critical));
        frame.render_widget(paragraph, area);
        return;
    }

    let position = match app.bucket_label() {
        Some(label) => format!("bucket {} ", label),
        None => String::new(),
    };
    let status = format!(
        " {}| ←/→:bucket Enter:details Tab:view ?:help q:quit",
        position
    );
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab         Next view"),
        Line::from("  1/2/3       Jump to view"),
        Line::from("  ←/→ h/l     Move bucket cursor"),
        Line::from("  PgUp/PgDn   Jump 10 buckets"),
        Line::from("  Home/End    First/last bucket"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Blocked IPs",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Enter       Bucket detail popup"),
        Line::from("  Esc         Close popup"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
