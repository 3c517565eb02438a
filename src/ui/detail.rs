//! Bucket detail popup.
//!
//! Displays a modal overlay listing the raw blocked addresses behind the
//! selected bucket, reconstructed by the tooltip resolver from the current
//! cycle's detail index.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum width required for the popup to render properly.
const MIN_OVERLAY_WIDTH: u16 = 30;
/// Minimum height required for the popup to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 6;

/// Render the bucket detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let title = match app.bucket_label() {
        Some(label) => format!(" Blocked at {} ", label),
        None => " Blocked addresses ".to_string(),
    };

    let mut lines: Vec<Line> = app.tooltip_lines().into_iter().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "←/→: other buckets  Esc: close",
        Style::default().add_modifier(Modifier::DIM),
    ));

    let overlay_width = 44u16.min(area.width.saturating_sub(4));
    let overlay_height = ((lines.len() as u16) + 2)
        .clamp(MIN_OVERLAY_HEIGHT, area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}
