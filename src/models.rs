mod answer;
mod confidence;
mod document;
mod interaction;
mod variant;

pub use answer::{AnswerResult, NO_CITATIONS};
pub use confidence::Confidence;
pub use document::Document;
pub use interaction::Interaction;
pub use variant::{DisplayPreferences, Variant};
