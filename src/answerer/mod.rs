//! Document question answering using LLMs.
//!
//! This module builds variant-specific prompts, sends them through a
//! `ModelClient`, and parses the tagged replies into `AnswerResult`s.

mod parser;
mod policy;
mod prompt;
mod question_answerer;

pub use parser::parse;
pub use policy::{MAX_OUTPUT_TOKENS, sampling_for, select_variant};
pub use prompt::{NOT_FOUND_ANSWER, build_prompt};
pub use question_answerer::QuestionAnswerer;
