use serde::{Deserialize, Serialize};
use std::fmt;

/// Self-reported confidence attached to an answer.
///
/// `High`, `Medium`, `Low` and `None` come from the model's `CONFIDENCE:` line.
/// `Error` marks a failed provider call and `Unknown` a reply that carried no
/// recognizable confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    /// Information is clearly stated in the document.
    High,
    /// Information is implied or partially stated.
    Medium,
    /// Information is missing or very unclear.
    Low,
    /// The model reported that the document does not contain the answer.
    None,
    /// The provider call failed; no answer was produced.
    Error,
    /// The reply did not contain a usable confidence value.
    Unknown,
}

impl Confidence {
    /// Parses a model-reported confidence token.
    ///
    /// Only the first whitespace-delimited token is considered, with
    /// surrounding punctuation such as `[HIGH]`, `**LOW**` or `MEDIUM.`
    /// stripped. Only the four levels a model may report are accepted;
    /// anything else yields `Unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfqa::Confidence;
    ///
    /// assert_eq!(Confidence::from_reported("HIGH"), Confidence::High);
    /// assert_eq!(Confidence::from_reported("[medium]"), Confidence::Medium);
    /// assert_eq!(Confidence::from_reported("fairly sure"), Confidence::Unknown);
    /// ```
    pub fn from_reported(value: &str) -> Self {
        let token = value
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_matches(|c: char| !c.is_alphanumeric());

        match token.to_ascii_uppercase().as_str() {
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            "LOW" => Self::Low,
            "NONE" => Self::None,
            _ => Self::Unknown,
        }
    }

    /// Returns the upper-case token used on the wire and in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::None => "NONE",
            Self::Error => "ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
