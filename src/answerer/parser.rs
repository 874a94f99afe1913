//! Line-tag parsing of model replies.
//!
//! A line that starts with `ANSWER:`, `CONFIDENCE:`, `REASONING:` or
//! `SOURCES:` (case-sensitive, column zero) opens a field whose value is the
//! rest of the line, trimmed. The last occurrence of a tag wins. For the
//! sources variant, non-empty lines after `SOURCES:` are folded into the
//! citation until the next tag.

use tracing::debug;

use crate::models::{AnswerResult, Confidence, Variant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Answer,
    Confidence,
    Reasoning,
    Sources,
}

impl Tag {
    const ALL: [Tag; 4] = [Tag::Answer, Tag::Confidence, Tag::Reasoning, Tag::Sources];

    fn prefix(self) -> &'static str {
        match self {
            Tag::Answer => "ANSWER:",
            Tag::Confidence => "CONFIDENCE:",
            Tag::Reasoning => "REASONING:",
            Tag::Sources => "SOURCES:",
        }
    }

    /// Splits a tag line into its tag and trimmed value.
    fn split(line: &str) -> Option<(Tag, &str)> {
        Self::ALL.iter().find_map(|&tag| {
            line.strip_prefix(tag.prefix())
                .map(|value| (tag, value.trim()))
        })
    }
}

/// Fields collected from a reply before variant-specific shaping.
#[derive(Debug, Default)]
struct TaggedFields {
    answer: Option<String>,
    confidence: Option<Confidence>,
    reasoning: Option<String>,
    sources: Option<String>,
    any_tag: bool,
}

fn scan(raw: &str, fold_sources: bool) -> TaggedFields {
    let mut fields = TaggedFields::default();
    let mut in_sources = false;

    for line in raw.lines() {
        if let Some((tag, value)) = Tag::split(line) {
            fields.any_tag = true;
            in_sources = tag == Tag::Sources;
            match tag {
                Tag::Answer => fields.answer = Some(value.to_string()),
                Tag::Confidence => fields.confidence = Some(Confidence::from_reported(value)),
                Tag::Reasoning => fields.reasoning = Some(value.to_string()),
                Tag::Sources => fields.sources = Some(value.to_string()),
            }
            continue;
        }

        let continuation = line.trim();
        if fold_sources
            && in_sources
            && !continuation.is_empty()
            && let Some(sources) = fields.sources.as_mut()
        {
            if !sources.is_empty() {
                sources.push(' ');
            }
            sources.push_str(continuation);
        }
    }

    fields
}

/// Parses a raw model reply into an [`AnswerResult`] for `variant`.
///
/// Plain replies are returned as the answer unchanged. For tagged variants a
/// reply without any tag line falls back to the raw text with `UNKNOWN`
/// confidence; so does a reply whose `ANSWER:` is missing or empty.
///
/// # Examples
///
/// ```
/// use pdfqa::{Confidence, Variant};
/// use pdfqa::answerer::parse;
///
/// let result = parse("ANSWER: Paris\nCONFIDENCE: HIGH\nREASONING: Stated directly", Variant::Confidence);
/// assert_eq!(result.answer(), "Paris");
/// assert_eq!(result.confidence(), Some(Confidence::High));
/// assert_eq!(result.reasoning(), Some("Stated directly"));
/// ```
pub fn parse(raw: &str, variant: Variant) -> AnswerResult {
    if !variant.is_tagged() {
        return AnswerResult::plain(raw);
    }

    let fields = scan(raw, variant == Variant::Sources);

    if !fields.any_tag {
        debug!(%variant, "reply has no tag lines, using raw text as answer");
        return AnswerResult::new(
            raw.to_string(),
            Some(Confidence::Unknown),
            None,
            None,
            raw.to_string(),
        );
    }

    let answer = fields
        .answer
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| raw.to_string());
    let confidence = Some(fields.confidence.unwrap_or(Confidence::Unknown));

    let (sources, reasoning) = match variant {
        Variant::Sources => (fields.sources, None),
        _ => (None, fields.reasoning),
    };

    AnswerResult::new(answer, confidence, sources, reasoning, raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_reply_is_fully_parsed() {
        let result = parse(
            "ANSWER: Paris\nCONFIDENCE: HIGH\nREASONING: Stated directly",
            Variant::Confidence,
        );
        assert_eq!(result.answer(), "Paris");
        assert_eq!(result.confidence(), Some(Confidence::High));
        assert_eq!(result.reasoning(), Some("Stated directly"));
        assert_eq!(result.sources(), None);
    }

    #[test]
    fn not_found_sources_reply_is_parsed() {
        let raw = "ANSWER: I cannot find information about this in the provided document.\nSOURCES: None\nCONFIDENCE: NONE";
        let result = parse(raw, Variant::Sources);
        assert!(result.answer().contains("cannot find"));
        assert_eq!(result.sources(), Some("None"));
        assert_eq!(result.confidence(), Some(Confidence::None));
        assert_eq!(result.reasoning(), None);
        assert!(!result.has_citations());
    }

    #[test]
    fn tag_order_does_not_matter() {
        let result = parse(
            "REASONING: Page one says so\nCONFIDENCE: MEDIUM\nANSWER: 1889",
            Variant::Confidence,
        );
        assert_eq!(result.answer(), "1889");
        assert_eq!(result.confidence(), Some(Confidence::Medium));
        assert_eq!(result.reasoning(), Some("Page one says so"));
    }

    #[test]
    fn last_duplicate_tag_wins() {
        let result = parse(
            "ANSWER: first\nCONFIDENCE: LOW\nANSWER: second\nCONFIDENCE: HIGH",
            Variant::Confidence,
        );
        assert_eq!(result.answer(), "second");
        assert_eq!(result.confidence(), Some(Confidence::High));
    }

    #[test]
    fn untagged_reply_falls_back_to_raw_text() {
        let raw = "The document is about climate change.\nIt mentions 1.1C warming.";
        for variant in [Variant::Confidence, Variant::Sources] {
            let result = parse(raw, variant);
            assert_eq!(result.answer(), raw);
            assert_eq!(result.confidence(), Some(Confidence::Unknown));
            assert_eq!(result.sources(), None);
            assert_eq!(result.reasoning(), None);
        }
    }

    #[test]
    fn tags_are_case_sensitive_and_anchored() {
        let raw = "answer: lower case\n  ANSWER: indented\nFinal ANSWER: inline";
        let result = parse(raw, Variant::Confidence);
        assert_eq!(result.answer(), raw);
        assert_eq!(result.confidence(), Some(Confidence::Unknown));
    }

    #[test]
    fn multi_line_sources_are_folded() {
        let raw = "ANSWER: 1.1C\nSOURCES: \"global temperatures have increased\n   by 1.1C since\n\n pre-industrial times\"\nCONFIDENCE: HIGH\ntrailing line";
        let result = parse(raw, Variant::Sources);
        assert_eq!(
            result.sources(),
            Some("\"global temperatures have increased by 1.1C since pre-industrial times\"")
        );
        assert_eq!(result.confidence(), Some(Confidence::High));
        assert_eq!(result.answer(), "1.1C");
    }

    #[test]
    fn sources_on_following_lines_only() {
        let raw = "ANSWER: yes\nSOURCES:\n  quoted line one\n  quoted line two\n";
        let result = parse(raw, Variant::Sources);
        assert_eq!(result.sources(), Some("quoted line one quoted line two"));
        assert_eq!(result.confidence(), Some(Confidence::Unknown));
    }

    #[test]
    fn continuation_lines_ignored_outside_sources() {
        let raw = "ANSWER: first line\nsecond line of answer\nCONFIDENCE: LOW\nREASONING: short\nmore reasoning";
        let result = parse(raw, Variant::Confidence);
        assert_eq!(result.answer(), "first line");
        assert_eq!(result.reasoning(), Some("short"));
    }

    #[test]
    fn foreign_tag_stops_sources_and_is_dropped() {
        let raw = "ANSWER: a\nSOURCES: quote\nREASONING: not requested\nstray";
        let result = parse(raw, Variant::Sources);
        assert_eq!(result.sources(), Some("quote"));
        assert_eq!(result.reasoning(), None);
    }

    #[test]
    fn missing_answer_tag_uses_raw_reply() {
        let raw = "CONFIDENCE: LOW\nREASONING: nothing relevant";
        let result = parse(raw, Variant::Confidence);
        assert_eq!(result.answer(), raw);
        assert_eq!(result.confidence(), Some(Confidence::Low));
        assert_eq!(result.reasoning(), Some("nothing relevant"));
    }

    #[test]
    fn missing_confidence_tag_is_unknown_not_inferred() {
        let result = parse(
            "ANSWER: I am highly confident it is Paris",
            Variant::Confidence,
        );
        assert_eq!(result.confidence(), Some(Confidence::Unknown));
        assert_eq!(result.reasoning(), None);
    }

    #[test]
    fn plain_variant_keeps_reply_verbatim() {
        let raw = "ANSWER: tagged anyway\nCONFIDENCE: HIGH\n";
        let result = parse(raw, Variant::Plain);
        assert_eq!(result.answer(), raw);
        assert_eq!(result.confidence(), None);
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let result = parse(
            "ANSWER: Paris\r\nCONFIDENCE: HIGH\r\nREASONING: Stated\r\n",
            Variant::Confidence,
        );
        assert_eq!(result.answer(), "Paris");
        assert_eq!(result.confidence(), Some(Confidence::High));
        assert_eq!(result.reasoning(), Some("Stated"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let raw = "SOURCES: a\n b\nANSWER: c\nCONFIDENCE: MEDIUM";
        assert_eq!(parse(raw, Variant::Sources), parse(raw, Variant::Sources));
    }

    #[test]
    fn raw_reply_is_preserved() {
        let raw = "ANSWER: x\nCONFIDENCE: LOW\nREASONING: y";
        assert_eq!(parse(raw, Variant::Confidence).raw_reply(), raw);
    }
}
