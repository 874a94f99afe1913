pub mod answerer;
pub mod config;
pub mod doctor;
pub mod extractor;
pub mod groq;
pub mod logging;
pub mod models;
pub mod session;
pub mod tui;

pub use answerer::QuestionAnswerer;
pub use config::{Config, ConfigError};
pub use extractor::{ExtractionError, PdfTextExtractor, TextExtractor, load_document};
pub use models::{AnswerResult, Confidence, DisplayPreferences, Document, Interaction, Variant};
pub use session::{Session, SessionError};
