//! File-type resolution for downloaded articles
//!
//! A download's provisional path always carries a `pdf` extension; once the
//! response headers are available the true type is resolved here and the
//! path's extension rewritten. The content-type header wins over the URL's
//! own extension, which wins over the default.

use url::Url;

/// Extension used for save paths before the true file type is known
pub const PROVISIONAL_EXTENSION: &str = "pdf";

/// Extension used when neither the content-type nor the URL resolves
pub const DEFAULT_EXTENSION: &str = "pdf";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Maps a Content-Type header value to a known extension
pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("application/pdf") {
        Some("pdf")
    } else if content_type.contains(DOCX_CONTENT_TYPE) || content_type.contains("application/msword")
    {
        Some("docx")
    } else {
        None
    }
}

/// Extracts a known extension from the URL path, ignoring the query string
pub fn extension_from_url(url: &Url) -> Option<&'static str> {
    let segment = url.path().rsplit('/').next()?;
    if !segment.contains('.') {
        return None;
    }

    match segment.rsplit('.').next()?.to_ascii_lowercase().as_str() {
        "pdf" => Some("pdf"),
        "docx" => Some("docx"),
        _ => None,
    }
}

/// Resolves the final extension for a completed download
///
/// Policy: content-type header first, URL extension second, `pdf` otherwise.
/// Pure and deterministic: the same inputs always resolve the same way.
pub fn resolve_extension(content_type: Option<&str>, url: &Url) -> &'static str {
    content_type
        .and_then(extension_from_content_type)
        .or_else(|| extension_from_url(url))
        .unwrap_or(DEFAULT_EXTENSION)
}
