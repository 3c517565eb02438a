//! Terminal event handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the bucket detail popup is open, handle popup-specific keys
    if app.show_detail {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow walking through buckets while the popup is open
            KeyCode::Left | KeyCode::Char('h') => app.cursor_left(1),
            KeyCode::Right | KeyCode::Char('l') => app.cursor_right(1),
            KeyCode::PageUp => app.cursor_left(10),
            KeyCode::PageDown => app.cursor_right(10),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            _ => {}
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => app.next_view(),
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::System),
        KeyCode::Char('3') => app.set_view(View::Bans),

        // Bucket cursor (the hover point on the bans chart)
        KeyCode::Left | KeyCode::Char('h') => app.cursor_left(1),
        KeyCode::Right | KeyCode::Char('l') => app.cursor_right(1),
        KeyCode::PageUp => app.cursor_left(10),
        KeyCode::PageDown => app.cursor_right(10),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),

        // Open the bucket detail popup
        KeyCode::Enter => app.toggle_detail(),

        // Close overlays
        KeyCode::Esc | KeyCode::Backspace => {
            app.close_overlay();
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel walks the bucket cursor
        MouseEventKind::ScrollUp => app.cursor_left(1),
        MouseEventKind::ScrollDown => app.cursor_right(1),
        _ => {}
    }
}
