//! Post-download document mining
//!
//! Opens each successfully downloaded file, extracts its raw text (dispatch
//! on the resolved extension), and mines the text for email addresses and a
//! keyword block. Mining is strictly best-effort: any failure for one file
//! yields an empty [`MineOutcome`] for that file only and never aborts the
//! batch.

mod docx;
pub mod patterns;
mod pdf;

use crate::records::MineOutcome;
use crate::MineError;
use std::path::Path;

/// Mines one downloaded document for emails and keywords
pub fn mine(path: &Path) -> MineOutcome {
    match extract_text(path) {
        Ok(text) => MineOutcome {
            emails: patterns::extract_emails(&text),
            keywords: patterns::extract_keywords(&text),
        },
        Err(e) => {
            tracing::warn!("Metadata extraction failed for {}: {}", path.display(), e);
            MineOutcome::default()
        }
    }
}

/// Extracts raw text from a document, dispatching on the file extension
pub fn extract_text(path: &Path) -> Result<String, MineError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf::extract_text(path),
        "docx" => docx::extract_text(path),
        other => Err(MineError::Unsupported(other.to_string())),
    }
}
