//! Question answering over a document's text.

use std::sync::Arc;

use tracing::{info, warn};

use crate::groq::ModelClient;
use crate::models::{AnswerResult, Variant};

use super::parser::parse;
use super::policy::sampling_for;
use super::prompt::build_prompt;

/// Answers questions about document text through a [`ModelClient`].
pub struct QuestionAnswerer {
    client: Arc<dyn ModelClient>,
}

impl QuestionAnswerer {
    #[must_use]
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Answers `question` about `document_text` with `model`, using `variant`.
    ///
    /// Never fails: a provider error becomes an error-shaped result whose
    /// answer starts with `Error:` and whose confidence is `ERROR`.
    pub fn answer(
        &self,
        model: &str,
        document_text: &str,
        question: &str,
        variant: Variant,
    ) -> AnswerResult {
        let prompt = build_prompt(document_text, question, variant);

        match self.client.complete(model, &prompt, sampling_for(variant)) {
            Ok(reply) => {
                let result = parse(&reply, variant);
                info!(
                    model,
                    %variant,
                    confidence = result.confidence().map(|c| c.as_str()).unwrap_or("-"),
                    "answered question"
                );
                result
            }
            Err(e) => {
                warn!(model, %variant, error = %e, "question could not be answered");
                AnswerResult::provider_error(e)
            }
        }
    }
}
