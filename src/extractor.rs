//! PDF text extraction.
//!
//! Turns a PDF byte stream into a single text blob. There is no OCR: a PDF
//! without a text layer is reported as [`ExtractionError::NoTextLayer`].

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Object, Stream, dictionary};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Document;

/// Reasons a document could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a readable PDF: {0}")]
    Unreadable(String),

    #[error("PDF is encrypted and cannot be read")]
    Encrypted,

    #[error("PDF has no extractable text layer (scanned documents are not supported)")]
    NoTextLayer,
}

/// Text pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: usize,
}

/// Converts document bytes into text.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// `lopdf`-backed extractor. Each page's text is followed by a newline.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let mut doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

        // Owner-restricted files open with the empty user password.
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                warn!(error = %e, "PDF requires a user password");
                ExtractionError::Encrypted
            })?;
        }

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut text = String::new();

        for &page_number in pages.keys() {
            match doc.extract_text(&[page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => warn!(page = page_number, error = %e, "skipping page without decodable text"),
            }
        }

        if text.trim().is_empty() {
            return Err(ExtractionError::NoTextLayer);
        }

        Ok(ExtractedText { text, page_count })
    }
}

/// Reads the file at `path` and extracts it into a [`Document`] named after the file.
pub fn load_document(
    path: &Path,
    extractor: &dyn TextExtractor,
) -> Result<Document, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let extracted = extractor.extract(&bytes)?;
    let document = Document::new(name, extracted.text, extracted.page_count);

    info!(
        document = document.name(),
        pages = document.page_count(),
        chars = document.char_count(),
        "extracted document text"
    );

    Ok(document)
}

/// Builds a minimal one-page PDF whose text layer is `text`.
///
/// Used by the setup check to exercise the PDF backend end to end.
pub fn single_page_pdf(text: &str) -> Result<Vec<u8>, ExtractionError> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    Ok(bytes)
}
