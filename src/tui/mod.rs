//! Terminal User Interface for pdfqa.
//!
//! Provides an interactive session: open a PDF, ask questions, browse and
//! delete past answers. Uses ratatui for rendering and crossterm for
//! terminal management.

use std::io;
use std::panic;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::answerer::QuestionAnswerer;
use crate::extractor::{TextExtractor, load_document};

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, InputMode, PREVIEW_CHARS, Status};
use event::Action;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Must run before exiting, even on error, to avoid leaving the terminal in
/// raw mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal, then defers to the
/// original hook.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Loads the PDF at `path` into the session, reporting the outcome in the
/// status line. On failure the previous document stays loaded.
pub fn open_document(app: &mut App, path: &Path, extractor: &dyn TextExtractor) {
    match load_document(path, extractor) {
        Ok(document) => {
            let message = format!(
                "Loaded {} ({} pages, {} characters)",
                document.name(),
                document.page_count(),
                document.char_count()
            );
            app.session_mut().load_document(document);
            app.clear_selection();
            app.set_info(message);
        }
        Err(e) => app.set_error(format!("Failed to open {}: {e}", path.display())),
    }
}

/// Asks `question` through the session and selects the new answer.
///
/// The input box is cleared only once the question is recorded. Session
/// errors go to the status line and leave the typed question in place.
pub fn submit_question(app: &mut App, answerer: &QuestionAnswerer, question: &str) {
    let model = app.model();
    let preferences = app.preferences();

    match app
        .session_mut()
        .ask(answerer, question, model, preferences)
        .map(|interaction| interaction.result.is_error())
    {
        Ok(is_error) => {
            app.clear_input();
            app.select_latest();
            if is_error {
                app.set_error("The model request failed; see the answer panel");
            } else {
                app.set_info(format!("Answered by {model}"));
            }
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

/// Runs the main event loop until the user quits.
///
/// The terminal is always restored, even when the loop fails.
pub fn run_event_loop(
    app: &mut App,
    answerer: &QuestionAnswerer,
    extractor: &dyn TextExtractor,
) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, answerer, extractor, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    answerer: &QuestionAnswerer,
    extractor: &dyn TextExtractor,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if !crossterm_event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = crossterm_event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match event::handle_key_event(app, key) {
            Action::None => {}
            Action::Quit => break,
            Action::Submit(question) => {
                // The request blocks; show progress before it starts.
                app.set_info(format!("Asking {}...", app.model()));
                terminal.draw(|frame| ui::draw(frame, app))?;
                submit_question(app, answerer, &question);
            }
            Action::Open(path) => {
                app.set_info(format!("Reading {}...", path.display()));
                terminal.draw(|frame| ui::draw(frame, app))?;
                open_document(app, &path, extractor);
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI.
///
/// Optionally preloads `initial_pdf`; a failure there is shown in the status
/// line rather than aborting.
pub fn run(
    answerer: &QuestionAnswerer,
    extractor: &dyn TextExtractor,
    model: &str,
    initial_pdf: Option<&Path>,
) -> Result<()> {
    init_panic_hook();

    let mut app = App::new(model);
    if let Some(path) = initial_pdf {
        open_document(&mut app, path, extractor);
    }

    run_event_loop(&mut app, answerer, extractor).context("TUI event loop failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExtractedText, ExtractionError};
    use crate::groq::{ModelClient, ProviderError, SamplingParams};
    use crate::models::Confidence;
    use std::io::Write;
    use std::sync::Arc;

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
            Ok(ExtractedText {
                text: self.0.to_string(),
                page_count: 2,
            })
        }
    }

    struct RejectingExtractor;

    impl TextExtractor for RejectingExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
            Err(ExtractionError::NoTextLayer)
        }
    }

    struct CannedClient;

    impl ModelClient for CannedClient {
        fn complete(
            &self,
            _model: &str,
            _prompt: &str,
            _sampling: SamplingParams,
        ) -> Result<String, ProviderError> {
            Ok("ANSWER: Paris\nSOURCES: \"Paris is the capital\"\nCONFIDENCE: HIGH".to_string())
        }
    }

    fn temp_pdf() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("failed to create temp file");
        file.write_all(b"%PDF-1.4 placeholder")
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn open_document_loads_and_reports() {
        let file = temp_pdf();
        let mut app = App::new("llama3-8b-8192");

        open_document(&mut app, file.path(), &FixedExtractor("Paris is the capital."));

        let doc = app.session().document().expect("document should be loaded");
        assert_eq!(doc.text(), "Paris is the capital.");
        assert_eq!(doc.page_count(), 2);
        let status = app.status().unwrap();
        assert!(!status.is_error);
        assert!(status.message.starts_with("Loaded "));
    }

    #[test]
    fn failed_open_keeps_previous_document() {
        let file = temp_pdf();
        let mut app = App::new("llama3-8b-8192");
        open_document(&mut app, file.path(), &FixedExtractor("first"));

        open_document(&mut app, file.path(), &RejectingExtractor);

        assert_eq!(app.session().document().unwrap().text(), "first");
        assert!(app.status().unwrap().is_error);
    }

    #[test]
    fn missing_file_is_reported_in_status() {
        let mut app = App::new("llama3-8b-8192");
        open_document(
            &mut app,
            Path::new("/definitely/not/here.pdf"),
            &FixedExtractor("x"),
        );

        assert!(app.session().document().is_none());
        let status = app.status().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains("/definitely/not/here.pdf"));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.push_char(c);
        }
    }

    #[test]
    fn submit_without_document_sets_error() {
        let mut app = App::new("llama3-8b-8192");
        let answerer = QuestionAnswerer::new(Arc::new(CannedClient));

        submit_question(&mut app, &answerer, "Where?");

        assert!(app.session().is_empty());
        assert!(app.status().unwrap().message.contains("no document"));
    }

    #[test]
    fn rejected_submit_keeps_typed_question() {
        let mut app = App::new("llama3-8b-8192");
        let answerer = QuestionAnswerer::new(Arc::new(CannedClient));
        type_text(&mut app, "Where is it?");

        submit_question(&mut app, &answerer, "Where is it?");

        assert!(app.status().unwrap().is_error);
        assert_eq!(app.input(), "Where is it?");
    }

    #[test]
    fn accepted_submit_clears_input() {
        let file = temp_pdf();
        let mut app = App::new("llama3-8b-8192");
        open_document(&mut app, file.path(), &FixedExtractor("Paris is the capital."));
        let answerer = QuestionAnswerer::new(Arc::new(CannedClient));
        type_text(&mut app, "What is the capital?");

        submit_question(&mut app, &answerer, "What is the capital?");

        assert_eq!(app.input(), "");
        assert_eq!(app.session().len(), 1);
    }

    #[test]
    fn submit_records_and_selects_answer() {
        let file = temp_pdf();
        let mut app = App::new("mixtral-8x7b-32768");
        open_document(&mut app, file.path(), &FixedExtractor("Paris is the capital."));
        let answerer = QuestionAnswerer::new(Arc::new(CannedClient));

        submit_question(&mut app, &answerer, "What is the capital?");

        assert_eq!(app.selected_index(), Some(0));
        let interaction = app.selected_interaction().unwrap();
        assert_eq!(interaction.model, "mixtral-8x7b-32768");
        assert_eq!(interaction.result.answer(), "Paris");
        assert_eq!(interaction.result.confidence(), Some(Confidence::High));
        assert!(app.status().unwrap().message.contains("mixtral-8x7b-32768"));
    }
}
