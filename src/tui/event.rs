//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes. Anything that
//! needs I/O (asking the model, reading a PDF) is returned as an [`Action`] for
//! the event loop to perform.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus, InputMode};

/// Work the event loop must do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Ask this question about the loaded document
    Submit(String),
    /// Load the PDF at this path
    Open(PathBuf),
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+C`: quit from anywhere; `q` quits outside the input box
/// - `F2` / `F3` / `F4`: cycle model, toggle confidence, toggle sources
/// - `Ctrl+O`: type a PDF path into the input box
/// - `Tab` / `Shift+Tab`: cycle focus
/// - `Esc`: cancel path entry and return to the input box
/// - Input focused: typing edits the buffer, `Enter` submits
/// - History focused: `j`/`k` navigate, `d`/`Delete` delete
/// - Detail focused: `j`/`k` scroll
///
/// # Examples
///
/// ```
/// use pdfqa::tui::{App, event::{Action, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new("llama3-8b-8192");
/// let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), Action::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Action::Quit,
            KeyCode::Char('o') => {
                app.begin_open();
                return Action::None;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::F(2) => {
            app.cycle_model();
            return Action::None;
        }
        KeyCode::F(3) => {
            app.toggle_confidence();
            return Action::None;
        }
        KeyCode::F(4) => {
            app.toggle_sources();
            return Action::None;
        }
        KeyCode::Tab => {
            app.next_focus();
            return Action::None;
        }
        KeyCode::BackTab => {
            app.prev_focus();
            return Action::None;
        }
        KeyCode::Esc => {
            app.cancel_open();
            app.reset_focus();
            app.clear_selection();
            return Action::None;
        }
        _ => {}
    }

    match app.focus() {
        Focus::Input => handle_input(app, key),
        Focus::History => handle_history(app, key),
        Focus::Detail => handle_detail(app, key),
    }
}

/// Handles keyboard input when the input box is focused.
fn handle_input(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_char(c);
            Action::None
        }
        KeyCode::Backspace => {
            app.pop_char();
            Action::None
        }
        KeyCode::Enter => submit(app),
        _ => Action::None,
    }
}

fn submit(app: &mut App) -> Action {
    match app.input_mode() {
        InputMode::Question => {
            if app.input().trim().is_empty() {
                app.set_error("Please enter a question");
                return Action::None;
            }
            // Cleared by the loop once the session accepts the question.
            Action::Submit(app.input().to_string())
        }
        InputMode::OpenPath => {
            let path = app.take_input();
            app.cancel_open();
            let path = path.trim();
            if path.is_empty() {
                app.set_error("No path entered");
                return Action::None;
            }
            Action::Open(PathBuf::from(path))
        }
    }
}

/// Handles keyboard input when the history list is focused.
fn handle_history(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        _ => {}
    }
    Action::None
}

/// Handles keyboard input when the detail panel is focused.
fn handle_detail(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail_up(1),
        KeyCode::PageDown => app.scroll_detail_down(10),
        KeyCode::PageUp => app.scroll_detail_up(10),
        _ => {}
    }
    Action::None
}
