//! In-memory question/answer session over one loaded document.

use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::answerer::{QuestionAnswerer, select_variant};
use crate::models::{Document, DisplayPreferences, Interaction};

/// Errors raised by session operations before any model call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no document loaded; open a PDF first")]
    NoDocument,

    #[error("question must not be blank")]
    EmptyQuestion,

    #[error("no interaction at position {0}")]
    NoSuchInteraction(usize),
}

/// Holds the active document and the history of questions asked.
///
/// History lives only as long as the session. Replacing the document keeps
/// earlier interactions; each one records the document it was asked against.
///
/// # Examples
///
/// ```
/// use pdfqa::{Document, Session};
///
/// let mut session = Session::new();
/// assert!(session.document().is_none());
///
/// session.load_document(Document::new("notes.pdf", "Some text", 1));
/// assert_eq!(session.document().map(|d| d.name()), Some("notes.pdf"));
/// assert!(session.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Session {
    document: Option<Document>,
    history: Vec<Interaction>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `document` the active document, replacing any previous one.
    pub fn load_document(&mut self, document: Document) {
        debug!(
            name = document.name(),
            pages = document.page_count(),
            chars = document.char_count(),
            "document loaded into session"
        );
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Asks `question` about the active document and records the exchange.
    ///
    /// The variant is chosen from `preferences`. Provider failures are not
    /// errors here: they are recorded as error-shaped interactions.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoDocument`] when nothing is loaded and
    /// [`SessionError::EmptyQuestion`] for a blank question. In both cases no
    /// model call is made and history is unchanged.
    pub fn ask(
        &mut self,
        answerer: &QuestionAnswerer,
        question: &str,
        model: &str,
        preferences: DisplayPreferences,
    ) -> Result<&Interaction, SessionError> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(SessionError::EmptyQuestion);
        }

        let variant = select_variant(preferences);
        let result = answerer.answer(model, document.text(), question, variant);

        let interaction = Interaction {
            question: question.to_string(),
            result,
            model: model.to_string(),
            variant,
            preferences,
            document_name: document.name().to_string(),
            asked_at: OffsetDateTime::now_utc(),
        };
        self.history.push(interaction);
        debug!(total = self.history.len(), "interaction recorded");

        Ok(&self.history[self.history.len() - 1])
    }

    /// Iterates over the history, most recent first.
    pub fn interactions_recent_first(&self) -> impl Iterator<Item = &Interaction> {
        self.history.iter().rev()
    }

    /// Returns the interaction at `display_index` in most-recent-first order.
    pub fn interaction(&self, display_index: usize) -> Option<&Interaction> {
        self.storage_index(display_index).map(|i| &self.history[i])
    }

    /// Removes the interaction at `display_index` (most-recent-first order).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchInteraction`] when the index is out of range.
    pub fn delete(&mut self, display_index: usize) -> Result<Interaction, SessionError> {
        let index = self
            .storage_index(display_index)
            .ok_or(SessionError::NoSuchInteraction(display_index))?;
        let removed = self.history.remove(index);
        debug!(display_index, remaining = self.history.len(), "interaction deleted");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn storage_index(&self, display_index: usize) -> Option<usize> {
        (display_index < self.history.len()).then(|| self.history.len() - 1 - display_index)
    }
}
