//! Record serialization
//!
//! `metadata.json` is an array of records in stable field order, UTF-8 with
//! non-ASCII preserved (serde_json does not escape non-ASCII, matching the
//! journal sites' accented author names and symbols).

use crate::records::ArticleRecord;
use crate::Result;
use std::path::Path;

/// Writes the full record batch as pretty-printed JSON
pub fn write_metadata(records: &[ArticleRecord], path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a record batch back from disk
pub fn load_metadata(path: &Path) -> Result<Vec<ArticleRecord>> {
    let content = std::fs::read_to_string(path)?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}
