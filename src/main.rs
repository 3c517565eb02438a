// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};

mod app;
mod chart;
mod data;
mod events;
mod source;
mod tooltip;
mod ui;

use app::App;
use source::{FileSource, Fetcher, HttpSource, UpdateSource};

/// Default refresh interval in seconds, matching the backend sample rate.
const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "banwatch")]
#[command(about = "Terminal dashboard for system metrics and blocked-IP activity")]
struct Args {
    /// Base URL of the monitoring backend
    #[arg(short, long, default_value = "http://127.0.0.1:5000", conflicts_with_all = ["metrics_file", "bans_file"])]
    url: String,

    /// Refresh interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_REFRESH_SECS)]
    refresh: u64,

    /// Replay a captured /api/history payload from a file
    #[arg(long, requires = "bans_file")]
    metrics_file: Option<PathBuf>,

    /// Replay a captured /api/bans-details payload from a file
    #[arg(long, requires = "metrics_file")]
    bans_file: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    // File replay mode
    if let (Some(metrics), Some(bans)) = (&args.metrics_file, &args.bans_file) {
        let source = Box::new(FileSource::new(metrics, bans));
        return run_tui(source);
    }

    run_with_http(&args.url, Duration::from_secs(args.refresh.max(1)))
}

/// Set up tracing. Without a log file, diagnostics are dropped rather than
/// written to stderr, which the TUI owns.
fn init_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("banwatch=debug".parse()?))
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run with the HTTP polling source.
fn run_with_http(url: &str, interval: Duration) -> Result<()> {
    // Build a tokio runtime for the fetch tasks; the TUI itself stays on
    // the main thread.
    let rt = tokio::runtime::Runtime::new()?;

    let source = {
        let _guard = rt.enter();
        Box::new(HttpSource::spawn(Fetcher::new(url), interval)) as Box<dyn UpdateSource>
    };

    let result = run_tui(source);

    // Dropping the runtime aborts any in-flight fetch tasks.
    drop(rt);
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn UpdateSource>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Apply any cycles that completed since the last frame
        app.poll_updates();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, banner_area(area));
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Charts
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);
            ui::charts::render(frame, app, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render bucket detail popup if active
            if app.show_detail {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Centered area for the resize banner. Stays inside `area` even when the
/// terminal is only a row or two tall.
fn banner_area(area: Rect) -> Rect {
    let height = area.height.min(5);
    let y = area.y + (area.height - height) / 2;
    Rect::new(area.x, y, area.width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_area_is_centered() {
        let banner = banner_area(Rect::new(0, 0, 80, 24));
        assert_eq!(banner, Rect::new(0, 9, 80, 5));
    }

    #[test]
    fn banner_area_fits_short_terminals() {
        // A two-row terminal must not push the banner above row zero.
        let banner = banner_area(Rect::new(0, 0, 40, 2));
        assert_eq!(banner, Rect::new(0, 0, 40, 2));

        let banner = banner_area(Rect::new(0, 0, 40, 1));
        assert_eq!(banner, Rect::new(0, 0, 40, 1));
    }
}
