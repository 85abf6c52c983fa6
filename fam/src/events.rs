//! Event handling for the aspect manager TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use fam_core::Category;

use crate::app::{App, InputMode};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    // Ctrl-C always quits, unsaved changes or not
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    let result = match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Rename | InputMode::AddAspect | InputMode::Command => {
            handle_edit_mode(app, key)
        }
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

/// Handle keys in NORMAL mode
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        // Entity navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_prev();
            EventResult::NeedsRedraw
        }

        // Aspect navigation
        KeyCode::Char('J') | KeyCode::Right => {
            app.select_next_aspect();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('K') | KeyCode::Left => {
            app.select_prev_aspect();
            EventResult::NeedsRedraw
        }

        // Use an aspect
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.increment_selected();
            EventResult::NeedsRedraw
        }

        // New entity by category: 1=PC .. 5=Object
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(category) = Category::from_index(index) {
                app.add_entity(category);
            }
            EventResult::NeedsRedraw
        }

        // Editing
        KeyCode::Char('r') => {
            app.begin_rename();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('a') => {
            app.begin_add_aspect();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            app.remove_selected();
            EventResult::NeedsRedraw
        }

        // Files
        KeyCode::Char('w') => {
            app.save();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(':') => {
            app.enter_command_mode();
            EventResult::NeedsRedraw
        }

        // Help
        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        KeyCode::Char('q') => {
            app.request_quit(false);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys while typing a name, an aspect label or a command
fn handle_edit_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.cancel_input();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            app.submit_input();
            EventResult::NeedsRedraw
        }

        KeyCode::Left => {
            // Keep the cursor after the ':' prompt
            if app.input_mode != InputMode::Command || app.cursor_position() > 1 {
                app.cursor_left();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            if app.input_mode == InputMode::Command && app.input_buffer() == ":" {
                // Backspace on just ":" exits command mode
                app.cancel_input();
            } else if app.input_mode != InputMode::Command || app.cursor_position() > 1 {
                app.backspace();
            }
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle key when overlay is open
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
