//! Input handling for the bulletin TUI.
//!
//! One delegated key handler for the whole page: toggle and selection keys
//! resolve their target (focused post, highlighted user) at press time, so
//! nothing is bound or unbound when the content refreshes.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use bulletin_engine::{App, Pane};

/// Drain all pending terminal events without blocking.
///
/// Returns `true` when the user asked to quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Up | KeyCode::Char('k') => match app.focus() {
            Pane::Selector => app.move_cursor_up(),
            Pane::Posts => app.focus_previous_post(),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.focus() {
            Pane::Selector => app.move_cursor_down(),
            Pane::Posts => app.focus_next_post(),
        },
        KeyCode::Enter => match app.focus() {
            Pane::Selector => {
                if let Some(user) = app.select_at_cursor() {
                    debug!(%user, "selection accepted");
                }
            }
            Pane::Posts => {
                app.toggle_focused_comments();
            }
        },
        KeyCode::Char(' ') => {
            if app.focus() == Pane::Posts {
                app.toggle_focused_comments();
            }
        }
        _ => {}
    }
    false
}
