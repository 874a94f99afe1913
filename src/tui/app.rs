use crate::groq::SUPPORTED_MODELS;
use crate::models::{DisplayPreferences, Interaction};
use crate::session::Session;

/// Characters of the document shown when no interaction is selected.
pub const PREVIEW_CHARS: usize = 500;

/// Application state for the TUI.
///
/// Owns the session plus everything the screen needs: model choice, display
/// toggles, input buffer, selection, and the status line.
#[derive(Debug)]
pub struct App {
    session: Session,
    /// Index into `SUPPORTED_MODELS`
    model_index: usize,
    preferences: DisplayPreferences,
    /// Text typed into the input box
    input: String,
    input_mode: InputMode,
    focus: Focus,
    /// Selected history entry in display order (0 = newest)
    selected_index: Option<usize>,
    detail_scroll: u16,
    status: Option<Status>,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Input box is focused (typing edits the question or path)
    Input,
    /// History list is focused (j/k navigation, d to delete)
    History,
    /// Detail panel is focused (j/k scrolling)
    Detail,
}

/// What the input box is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Question,
    /// Ctrl+O was pressed; Enter opens the typed path
    OpenPath,
}

/// A message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl App {
    /// Creates an App starting on `model` with both toggles on.
    ///
    /// An identifier outside `SUPPORTED_MODELS` falls back to the first entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfqa::tui::{App, Focus};
    ///
    /// let app = App::new("llama3-70b-8192");
    /// assert_eq!(app.model(), "llama3-70b-8192");
    /// assert_eq!(app.focus(), Focus::Input);
    /// assert!(app.session().document().is_none());
    /// ```
    pub fn new(model: &str) -> Self {
        let model_index = SUPPORTED_MODELS
            .iter()
            .position(|m| *m == model)
            .unwrap_or(0);

        Self {
            session: Session::new(),
            model_index,
            preferences: DisplayPreferences::default(),
            input: String::new(),
            input_mode: InputMode::Question,
            focus: Focus::Input,
            selected_index: None,
            detail_scroll: 0,
            status: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Returns the currently selected model identifier.
    pub fn model(&self) -> &'static str {
        SUPPORTED_MODELS[self.model_index]
    }

    /// Advances to the next supported model, wrapping around.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfqa::tui::App;
    ///
    /// let mut app = App::new("gemma2-9b-it");
    /// app.cycle_model();
    /// assert_eq!(app.model(), "llama3-8b-8192");
    /// ```
    pub fn cycle_model(&mut self) {
        self.model_index = (self.model_index + 1) % SUPPORTED_MODELS.len();
        self.set_info(format!("Model: {}", self.model()));
    }

    pub fn preferences(&self) -> DisplayPreferences {
        self.preferences
    }

    pub fn toggle_confidence(&mut self) {
        self.preferences.show_confidence = !self.preferences.show_confidence;
    }

    pub fn toggle_sources(&mut self) {
        self.preferences.show_sources = !self.preferences.show_sources;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Empties the input box and returns what it held.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Switches the input box to path entry (Ctrl+O).
    pub fn begin_open(&mut self) {
        self.input_mode = InputMode::OpenPath;
        self.input.clear();
        self.focus = Focus::Input;
        self.set_info("Enter a PDF path and press Enter");
    }

    /// Leaves path entry without opening anything.
    pub fn cancel_open(&mut self) {
        if self.input_mode == InputMode::OpenPath {
            self.input_mode = InputMode::Question;
            self.input.clear();
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Cycles focus: `Input` -> `History` -> `Detail` -> `Input`.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::History,
            Focus::History => Focus::Detail,
            Focus::Detail => Focus::Input,
        };
        self.auto_select_on_history_focus();
    }

    /// Cycles focus in reverse Tab order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Detail,
            Focus::History => Focus::Input,
            Focus::Detail => Focus::History,
        };
        self.auto_select_on_history_focus();
    }

    fn auto_select_on_history_focus(&mut self) {
        if self.focus == Focus::History && self.selected_index.is_none() && !self.session.is_empty()
        {
            self.selected_index = Some(0);
        }
    }

    /// Returns focus to the input box (Esc).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::Input;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_interaction(&self) -> Option<&Interaction> {
        self.selected_index.and_then(|i| self.session.interaction(i))
    }

    /// Moves selection down the history, wrapping at the end.
    pub fn select_next(&mut self) {
        let len = self.session.len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
        self.detail_scroll = 0;
    }

    /// Moves selection up the history, wrapping at the start.
    pub fn select_previous(&mut self) {
        let len = self.session.len();
        if len == 0 {
            self.selected_index = None;
            return;
        }

        self.selected_index = Some(match self.selected_index {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        });
        self.detail_scroll = 0;
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
        self.detail_scroll = 0;
    }

    /// Selects the newest interaction, e.g. right after an answer arrives.
    pub fn select_latest(&mut self) {
        self.selected_index = (!self.session.is_empty()).then_some(0);
        self.detail_scroll = 0;
    }

    /// Deletes the selected interaction and keeps a valid selection.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected_index else {
            self.set_error("No interaction selected");
            return;
        };

        match self.session.delete(index) {
            Ok(_) => {
                let len = self.session.len();
                self.selected_index = match len {
                    0 => None,
                    _ => Some(index.min(len - 1)),
                };
                self.detail_scroll = 0;
                self.set_info("Interaction deleted");
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            is_error: true,
        });
    }
}
