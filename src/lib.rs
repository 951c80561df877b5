//! Offprint: a journal article harvester
//!
//! This crate crawls a journal listing page, correlates the per-article
//! fragments it finds into structured records, downloads the linked articles
//! with bounded concurrency, and mines the downloaded documents for email
//! addresses and keyword blocks.

pub mod config;
pub mod crawler;
pub mod miner;
pub mod output;
pub mod records;

use thiserror::Error;

/// Main error type for Offprint operations
///
/// Only run-fatal conditions live here. Per-record failures (a missing
/// download link, a failed download, an unreadable document) are carried in
/// [`records::DownloadOutcome`] and [`records::MineOutcome`] values instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page fetch failed: {0}")]
    PageFetch(#[from] FetchError),

    #[error("No article topics found at {url}; the page structure may have changed")]
    NoArticles { url: String },

    #[error("Invalid header value for '{name}' in fetch configuration")]
    InvalidHeader { name: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Classified page-fetch failures
///
/// The classification exists for operator messaging; every variant aborts the
/// current crawl run, since nothing downstream can proceed without the page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}; the site may be rejecting automated clients")]
    Http { url: String, status: u16 },

    #[error("Connection failed for {url}: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("Request timed out for {url}")]
    Timeout { url: String },

    #[error("Request failed for {url}: {source}")]
    Other { url: String, source: reqwest::Error },
}

/// Failures inside a single file download
///
/// Converted into a failed [`records::DownloadOutcome`] at the task boundary,
/// never propagated across it.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Failures inside document text extraction
///
/// Converted into an empty [`records::MineOutcome`] at the task boundary.
#[derive(Debug, Error)]
pub enum MineError {
    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("DOCX archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),
}

/// Result type alias for Offprint operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use records::{ArticleRecord, DownloadOutcome, DownloadTask, MineOutcome};
