//! PDF text extraction

use crate::MineError;
use lopdf::Document;
use std::path::Path;

/// Extracts all text from a PDF, page by page
///
/// A page that yields no text (scanned image, extraction failure) contributes
/// an empty string; only a document that cannot be opened at all is an error.
pub fn extract_text(path: &Path) -> Result<String, MineError> {
    let document = Document::load(path)?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number]).unwrap_or_default();
        text.push_str(&page_text);
        text.push('\n');
    }

    Ok(text)
}
