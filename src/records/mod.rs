//! Record types shared across the pipeline
//!
//! One [`ArticleRecord`] exists per detected topic fragment. The correlator
//! creates records, download outcomes update the file path, mining outcomes
//! fill in keywords and emails, and the coordinator serializes the batch at
//! the end of the run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// One row of crawl output
///
/// Field declaration order is the serialization order of `metadata.json`;
/// keep it stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Article title; the primary correlation key, never empty
    pub title: String,

    /// Page range as printed on the listing page, may be empty
    pub page_number: String,

    /// Author line as printed, may be empty
    pub authors: String,

    /// HTML-stripped, whitespace-normalized abstract text
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Save path; provisional until the true extension is resolved
    pub file_path: String,

    /// Comma-joined keyword list; empty until mined
    pub keywords: String,

    /// Comma-joined email list; empty until mined
    pub email: String,
}

/// One unit of download work, consumed exactly once by one worker
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// Index of the owning record in the batch
    pub index: usize,

    /// Absolute download URL, already resolved against the page URL
    pub url: Url,

    /// Provisional save path; the extension is rewritten once known
    pub save_path: PathBuf,
}

/// Terminal result of one download task
///
/// Never retried at this layer; retries live inside the fetch client.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Index of the owning record in the batch
    pub index: usize,

    /// The URL that was fetched
    pub url: String,

    /// Final save path (extension rewritten) on success, provisional on failure
    pub path: PathBuf,

    pub success: bool,

    /// Resolved file extension, present on success
    pub extension: Option<String>,

    /// Failure description, present on failure
    pub error: Option<String>,
}

impl DownloadOutcome {
    /// A successful outcome with the final path and resolved extension
    pub fn completed(task: &DownloadTask, path: PathBuf, extension: &str) -> Self {
        Self {
            index: task.index,
            url: task.url.to_string(),
            path,
            success: true,
            extension: Some(extension.to_string()),
            error: None,
        }
    }

    /// A failed outcome; the provisional path is kept for reporting
    pub fn failed(task: &DownloadTask, error: String) -> Self {
        Self {
            index: task.index,
            url: task.url.to_string(),
            path: task.save_path.clone(),
            success: false,
            extension: None,
            error: Some(error),
        }
    }
}

/// Result of mining one downloaded document
///
/// Empty on any extraction failure; mining never aborts the batch.
#[derive(Debug, Clone, Default)]
pub struct MineOutcome {
    /// Email addresses in first-seen order, deduplicated case-insensitively
    pub emails: Vec<String>,

    /// Keywords from the first matching extraction strategy
    pub keywords: Vec<String>,
}
