use serde::Serialize;

/// Extracted text of one loaded PDF.
///
/// Immutable once created; loading another file replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    name: String,
    text: String,
    page_count: usize,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>, page_count: usize) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            page_count,
        }
    }

    /// Returns the display name (usually the file name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full extracted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Number of characters (not bytes) in the extracted text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns the first `limit` characters, with `...` appended when truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfqa::Document;
    ///
    /// let doc = Document::new("a.pdf", "abcdef", 1);
    /// assert_eq!(doc.preview(3), "abc...");
    /// assert_eq!(doc.preview(10), "abcdef");
    /// ```
    pub fn preview(&self, limit: usize) -> String {
        match self.text.char_indices().nth(limit) {
            Some((byte_idx, _)) => format!("{}...", &self.text[..byte_idx]),
            None => self.text.clone(),
        }
    }
}
