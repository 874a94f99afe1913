use serde::Serialize;
use time::OffsetDateTime;

use super::{AnswerResult, DisplayPreferences, Variant};

/// One question/answer exchange recorded in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    /// The question as submitted.
    pub question: String,
    /// Parsed answer (or error-shaped result).
    pub result: AnswerResult,
    /// Model identifier the question was sent to.
    pub model: String,
    /// Variant used to build the prompt and parse the reply.
    pub variant: Variant,
    /// Display toggles in effect when the question was asked.
    pub preferences: DisplayPreferences,
    /// Name of the document the question was asked against.
    pub document_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub asked_at: OffsetDateTime,
}

impl Interaction {
    /// Returns true if the confidence level should be rendered.
    ///
    /// Provider failures always show their `ERROR` marker.
    pub fn shows_confidence(&self) -> bool {
        self.result.confidence().is_some()
            && (self.preferences.show_confidence || self.result.is_error())
    }

    /// Returns true if the sources section should be rendered.
    pub fn shows_sources(&self) -> bool {
        self.preferences.show_sources && self.variant == Variant::Sources
    }

    /// Returns a single-line label of at most `max_chars` characters for lists.
    pub fn question_preview(&self, max_chars: usize) -> String {
        let single_line = self.question.split_whitespace().collect::<Vec<_>>().join(" ");
        match single_line.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &single_line[..idx]),
            None => single_line,
        }
    }
}
