use std::fmt;

use serde::{Deserialize, Serialize};

use super::Confidence;

/// Shown in place of the sources when the model found nothing to quote.
pub const NO_CITATIONS: &str = "No specific citations available";

/// Structured result of answering one question.
///
/// Optional fields are present only when the variant that produced the result
/// asks for them; they are never filled with placeholder strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    sources: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    reasoning: Option<String>,
    raw_reply: String,
}

impl AnswerResult {
    pub fn new(
        answer: String,
        confidence: Option<Confidence>,
        sources: Option<String>,
        reasoning: Option<String>,
        raw_reply: String,
    ) -> Self {
        Self {
            answer,
            confidence,
            sources,
            reasoning,
            raw_reply,
        }
    }

    /// Result for an untagged reply: the reply is the answer.
    pub fn plain(raw_reply: impl Into<String>) -> Self {
        let raw_reply = raw_reply.into();
        Self::new(raw_reply.clone(), None, None, None, raw_reply)
    }

    /// Result standing in for a failed provider call.
    ///
    /// The answer reads `Error: <cause>` and confidence is `ERROR`, whatever
    /// variant was requested.
    pub fn provider_error(cause: impl fmt::Display) -> Self {
        Self::new(
            format!("Error: {cause}"),
            Some(Confidence::Error),
            None,
            None,
            String::new(),
        )
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    pub fn sources(&self) -> Option<&str> {
        self.sources.as_deref()
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// The model's reply exactly as received (empty for provider errors).
    pub fn raw_reply(&self) -> &str {
        &self.raw_reply
    }

    /// Returns true if this result represents a failed provider call.
    pub fn is_error(&self) -> bool {
        self.confidence == Some(Confidence::Error)
    }

    /// Returns true if the sources field holds an actual citation.
    ///
    /// Empty sources and the literal `None` the model is told to emit when
    /// nothing supports the answer do not count.
    pub fn has_citations(&self) -> bool {
        self.sources
            .as_deref()
            .map(str::trim)
            .is_some_and(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
    }

    /// Sources as presented to a reader: the citation, or [`NO_CITATIONS`]
    /// when the field is present but quotes nothing.
    pub fn displayed_sources(&self) -> Option<&str> {
        let sources = self.sources.as_deref()?;
        if self.has_citations() {
            Some(sources)
        } else {
            Some(NO_CITATIONS)
        }
    }
}
