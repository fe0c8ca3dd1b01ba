//! Keyboard dispatch for the UI loop.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};
use crate::energy_data::Period;

/// Handle one key event. Returns `Ok(true)` when the app should quit.
pub fn handle_key_event(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match (key_code, modifiers) {
        // Exit
        (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Ok(true),
        (KeyCode::Esc, _) => return Ok(true),

        // Screen navigation
        (KeyCode::Tab, KeyModifiers::NONE) => {
            app.next_screen();
            return Ok(false);
        }
        (KeyCode::BackTab, KeyModifiers::SHIFT) => {
            app.next_screen();
            return Ok(false);
        }

        _ => {}
    }

    match app.screen {
        Screen::Chat => handle_chat_key(app, key_code, modifiers),
        Screen::Graphs => handle_graphs_key(app, key_code),
    }
}

fn handle_chat_key(app: &mut App, key_code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match (key_code, modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => {
            app.submit_message();
        }
        (KeyCode::Enter, KeyModifiers::SHIFT) => {
            app.textarea.insert_newline();
        }
        (KeyCode::PageUp, _) => {
            app.scroll_offset = app.scroll_offset.saturating_sub(5);
        }
        (KeyCode::PageDown, _) => {
            app.scroll_offset = app.scroll_offset.saturating_add(5);
        }
        _ => {
            app.textarea
                .input(Event::Key(KeyEvent::new(key_code, modifiers)));
        }
    }
    Ok(false)
}

fn handle_graphs_key(app: &mut App, key_code: KeyCode) -> Result<bool> {
    match key_code {
        KeyCode::Left => app.cycle_period(false),
        KeyCode::Right => app.cycle_period(true),
        KeyCode::Char('1') => app.select_period(Period::Hour),
        KeyCode::Char('2') => app.select_period(Period::Day),
        KeyCode::Char('3') => app.select_period(Period::Week),
        KeyCode::Char('4') => app.select_period(Period::Month),
        _ => {}
    }
    Ok(false)
}
