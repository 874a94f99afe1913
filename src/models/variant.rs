use serde::{Deserialize, Serialize};
use std::fmt;

/// Prompt/parse contract used for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Free-form answer, no tagged fields.
    Plain,
    /// `ANSWER:` / `CONFIDENCE:` / `REASONING:` tagged reply.
    Confidence,
    /// `ANSWER:` / `SOURCES:` / `CONFIDENCE:` tagged reply.
    Sources,
}

impl Variant {
    /// Returns true if replies for this variant use tag lines.
    pub fn is_tagged(&self) -> bool {
        !matches!(self, Self::Plain)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Confidence => write!(f, "confidence"),
            Self::Sources => write!(f, "sources"),
        }
    }
}

/// The two user-facing display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    /// Show the model's self-reported confidence.
    pub show_confidence: bool,
    /// Show verbatim source citations.
    pub show_sources: bool,
}

impl DisplayPreferences {
    pub fn new(show_confidence: bool, show_sources: bool) -> Self {
        Self {
            show_confidence,
            show_sources,
        }
    }
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self::new(true, true)
    }
}
