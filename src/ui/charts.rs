//! Chart rendering.
//!
//! Draws the live chart handles each frame: line charts for CPU/RAM and
//! network, a grouped bar chart for blocked addresses. Reads only; all
//! chart mutation happens in the reconciler.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{App, View};
use crate::chart::{ChartHandle, ChartId};
use crate::ui::Theme;

/// Width of one bar in the bans chart.
const BAR_WIDTH: u16 = 2;
/// Gap between bucket groups in the bans chart.
const GROUP_GAP: u16 = 1;

/// Render the content area for the current view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_view {
        View::Overview => {
            let chunks = Layout::vertical([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);
            render_chart(frame, app, ChartId::CpuRam, chunks[0]);
            render_chart(frame, app, ChartId::Network, chunks[1]);
            render_chart(frame, app, ChartId::Bans, chunks[2]);
        }
        View::System => {
            let chunks =
                Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(area);
            render_chart(frame, app, ChartId::CpuRam, chunks[0]);
            render_chart(frame, app, ChartId::Network, chunks[1]);
        }
        View::Bans => {
            let chunks =
                Layout::horizontal([Constraint::Min(40), Constraint::Length(34)]).split(area);
            render_chart(frame, app, ChartId::Bans, chunks[0]);
            render_bucket_panel(frame, app, chunks[1]);
        }
    }
}

/// Render one chart, or a loading placeholder if it has no handle yet.
fn render_chart(frame: &mut Frame, app: &App, id: ChartId, area: Rect) {
    let Some(handle) = app.charts.get(id) else {
        render_placeholder(frame, &app.theme, id, area);
        return;
    };
    match id {
        ChartId::CpuRam | ChartId::Network => {
            render_line(frame, &app.theme, handle, id.title(), area)
        }
        ChartId::Bans => render_bars(frame, app, handle, area),
    }
}

fn render_placeholder(frame: &mut Frame, theme: &Theme, id: ChartId, area: Rect) {
    let block = chart_block(theme, Line::from(format!(" {} ", id.title())));
    let paragraph = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(block);
    frame.render_widget(paragraph, area);
}

fn chart_block<'a>(theme: &Theme, title: Line<'a>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(title)
}

/// Render a line chart from a live handle.
fn render_line(frame: &mut Frame, theme: &Theme, handle: &ChartHandle, title: &str, area: Rect) {
    let series: Vec<Vec<(f64, f64)>> = handle
        .datasets
        .iter()
        .map(|d| {
            d.values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = handle
        .datasets
        .iter()
        .zip(&series)
        .map(|(bound, points)| {
            Dataset::default()
                .name(bound.legend.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(bound.color))
                .graph_type(GraphType::Line)
                .data(points)
        })
        .collect();

    let sample_count = handle.labels.len();
    let x_max = sample_count.saturating_sub(1).max(1) as f64;
    let y_max = handle.style().y_max.unwrap_or_else(|| {
        handle
            .datasets
            .iter()
            .flat_map(|d| d.values.iter().copied())
            .fold(1.0_f64, f64::max)
            * 1.1
    });

    let tick_cap = handle
        .style()
        .tick_cap
        .min((area.width / 8).max(2) as usize);
    let x_labels: Vec<Span> = axis_ticks(&handle.labels, tick_cap)
        .into_iter()
        .map(Span::raw)
        .collect();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", y_max / 2.0)),
        Span::raw(format!("{:.0}", y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(theme, Line::from(format!(" {} ", title))))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([0.0, y_max]).labels(y_labels));

    frame.render_widget(chart, area);
}

/// Render the grouped bans bar chart, windowed around the bucket cursor.
fn render_bars(frame: &mut Frame, app: &App, handle: &ChartHandle, area: Rect) {
    let theme = &app.theme;

    let mut title_spans = vec![Span::raw(format!(" {} ", ChartId::Bans.title()))];
    for bound in &handle.datasets {
        title_spans.push(Span::styled(
            format!(" {} ", bound.legend),
            Style::default().fg(bound.color),
        ));
    }
    let block = chart_block(theme, Line::from(title_spans));

    let bucket_count = handle.labels.len();
    if bucket_count == 0 {
        // Absence of data is not a failure: an empty window renders as an
        // empty chart.
        let paragraph = Paragraph::new("No buckets in window")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Window of buckets that fits the area, centered on the cursor.
    let per_group = (2 * BAR_WIDTH + GROUP_GAP) as usize;
    let capacity = (area.width.saturating_sub(2) as usize / per_group).max(1);
    let start = app
        .bucket_cursor
        .saturating_sub(capacity / 2)
        .min(bucket_count.saturating_sub(capacity));
    let end = (start + capacity).min(bucket_count);

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(GROUP_GAP);

    for i in start..end {
        let label_style = if i == app.bucket_cursor {
            theme.selected
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let bars: Vec<Bar> = handle
            .datasets
            .iter()
            .map(|bound| {
                Bar::default()
                    .value(bound.values.get(i).copied().unwrap_or(0.0) as u64)
                    .style(Style::default().fg(bound.color))
            })
            .collect();
        let group = BarGroup::default()
            .label(Line::styled(handle.labels[i].clone(), label_style))
            .bars(&bars);
        chart = chart.data(group);
    }

    frame.render_widget(chart, area);
}

/// Render the live detail panel next to the bans chart.
///
/// Shows the raw addresses behind the bucket under the cursor, the same
/// content the detail popup shows.
fn render_bucket_panel(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.bucket_label() {
        Some(label) => format!(" Bucket {} ", label),
        None => " Bucket ".to_string(),
    };
    let block = chart_block(&app.theme, Line::from(title));

    let lines: Vec<Line> = app
        .tooltip_lines()
        .into_iter()
        .map(Line::from)
        .collect();
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Pick up to `cap` evenly spaced labels, always keeping first and last.
fn axis_ticks(labels: &[String], cap: usize) -> Vec<String> {
    if labels.is_empty() || cap == 0 {
        return Vec::new();
    }
    if labels.len() <= cap {
        return labels.to_vec();
    }
    let cap = cap.max(2);
    let last = labels.len() - 1;
    (0..cap)
        .map(|i| labels[i * last / (cap - 1)].clone())
        .collect()
}
