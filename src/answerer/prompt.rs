//! Prompt construction for the three answer variants.
//!
//! The whole document text is embedded verbatim; nothing is chunked or
//! truncated.

use crate::models::Variant;

/// Sentence the model is told to use when the document lacks the answer.
pub const NOT_FOUND_ANSWER: &str = "I cannot find information about this in the provided document.";

const PLAIN_INSTRUCTIONS: &str = "Based on the following PDF content, please answer the question.
If the answer cannot be found in the content, please say so.";

const CONFIDENCE_INSTRUCTIONS: &str =
    "Answer the question based on the provided content and rate your confidence.";

const CONFIDENCE_FORMAT: &str = "Provide your answer in this exact format:
ANSWER: [your answer here]
CONFIDENCE: [HIGH/MEDIUM/LOW]
REASONING: [brief explanation of why you're confident or not]

Rules:
- HIGH: Information is clearly stated in the text
- MEDIUM: Information is implied or partially stated
- LOW: Information is not found or very unclear";

const SOURCES_INSTRUCTIONS: &str =
    "Answer the question based on the provided content and cite specific parts of the text.";

const SOURCES_FORMAT: &str = "Provide your answer in this format:
ANSWER: [your answer here]
SOURCES: [quote the specific text that supports your answer]
CONFIDENCE: [HIGH/MEDIUM/LOW based on how clearly the information is stated]";

/// Builds the prompt for `question` over `document_text` using `variant`.
///
/// # Examples
///
/// ```
/// use pdfqa::Variant;
/// use pdfqa::answerer::build_prompt;
///
/// let prompt = build_prompt("Paris is the capital of France.", "What is the capital?", Variant::Confidence);
/// assert!(prompt.contains("Paris is the capital of France."));
/// assert!(prompt.contains("CONFIDENCE: [HIGH/MEDIUM/LOW]"));
/// ```
pub fn build_prompt(document_text: &str, question: &str, variant: Variant) -> String {
    match variant {
        Variant::Plain => format!(
            "{PLAIN_INSTRUCTIONS}\n\nPDF Content:\n{document_text}\n\nQuestion: {question}\n\nAnswer:"
        ),
        Variant::Confidence => format!(
            "{CONFIDENCE_INSTRUCTIONS}\n\nPDF Content:\n{document_text}\n\nQuestion: {question}\n\n\
             {CONFIDENCE_FORMAT}\n\
             - If no relevant information exists, respond with:\n\
             ANSWER: {NOT_FOUND_ANSWER}\n\
             CONFIDENCE: LOW\n\
             REASONING: The document does not contain this information."
        ),
        Variant::Sources => format!(
            "{SOURCES_INSTRUCTIONS}\n\nPDF Content:\n{document_text}\n\nQuestion: {question}\n\n\
             {SOURCES_FORMAT}\n\n\
             If the information is not in the text, respond with:\n\
             ANSWER: {NOT_FOUND_ANSWER}\n\
             SOURCES: None\n\
             CONFIDENCE: NONE"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "The Eiffel Tower is in Paris.\nIt was completed in 1889.";
    const QUESTION: &str = "When was the tower completed?";

    #[test]
    fn every_variant_embeds_document_and_question_verbatim() {
        for variant in [Variant::Plain, Variant::Confidence, Variant::Sources] {
            let prompt = build_prompt(DOC, QUESTION, variant);
            assert!(prompt.contains(DOC), "{variant} prompt lost the document");
            assert!(prompt.contains(QUESTION), "{variant} prompt lost the question");
        }
    }

    #[test]
    fn plain_prompt_asks_model_to_admit_missing_answers() {
        let prompt = build_prompt(DOC, QUESTION, Variant::Plain);
        assert!(prompt.contains("cannot be found"));
        assert!(prompt.ends_with("Answer:"));
        assert!(!prompt.contains("CONFIDENCE:"));
    }

    #[test]
    fn confidence_prompt_lists_exactly_its_tags() {
        let prompt = build_prompt(DOC, QUESTION, Variant::Confidence);
        assert!(prompt.contains("ANSWER:"));
        assert!(prompt.contains("CONFIDENCE: [HIGH/MEDIUM/LOW]"));
        assert!(prompt.contains("REASONING:"));
        assert!(!prompt.contains("SOURCES:"));
        assert!(prompt.contains(NOT_FOUND_ANSWER));
        assert!(prompt.contains("CONFIDENCE: LOW"));
    }

    #[test]
    fn sources_prompt_includes_fallback_block() {
        let prompt = build_prompt(DOC, QUESTION, Variant::Sources);
        assert!(prompt.contains("SOURCES: [quote"));
        assert!(prompt.contains("SOURCES: None"));
        assert!(prompt.contains("CONFIDENCE: NONE"));
        assert!(prompt.contains(NOT_FOUND_ANSWER));
        assert!(!prompt.contains("REASONING:"));
    }

    #[test]
    fn empty_document_still_builds_prompt() {
        for variant in [Variant::Plain, Variant::Confidence, Variant::Sources] {
            let prompt = build_prompt("", QUESTION, variant);
            assert!(prompt.contains("PDF Content:\n\n\nQuestion:"));
            assert!(prompt.contains(QUESTION));
        }
    }

    #[test]
    fn placeholder_like_text_is_not_substituted() {
        let prompt = build_prompt("literal {question} marker", "what is {document}?", Variant::Plain);
        assert!(prompt.contains("literal {question} marker"));
        assert!(prompt.contains("what is {document}?"));
    }
}
