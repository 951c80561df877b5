//! Run report: per-stage counts and enumerated failures

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One record that ended the run without a file
#[derive(Debug, Clone)]
pub struct RecordFailure {
    pub title: String,
    pub reason: String,
}

/// Summary of one crawl run
#[derive(Debug)]
pub struct CrawlReport {
    pub page_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Records emitted (equals the number of detected topics)
    pub articles_found: usize,

    /// Records that had a resolvable download URL
    pub tasks_submitted: usize,

    pub downloads_succeeded: usize,
    pub downloads_failed: usize,

    /// Linkless records and failed downloads, by title and reason
    pub failures: Vec<RecordFailure>,

    pub files_mined: usize,
    pub pdf_count: usize,
    pub docx_count: usize,

    pub metadata_path: PathBuf,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints the run report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("Source: {}", report.page_url);
    println!("Duration: {}s", report.duration_seconds());
    println!();
    println!("Articles found:      {}", report.articles_found);
    println!("Downloads submitted: {}", report.tasks_submitted);
    println!(
        "Downloads completed: {} ({} PDFs, {} DOCXs)",
        report.downloads_succeeded, report.pdf_count, report.docx_count
    );
    println!("Files mined:         {}", report.files_mined);

    if !report.failures.is_empty() {
        println!("\nRecords without files ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.title, failure.reason);
        }
    }

    println!("\nMetadata saved to {}", report.metadata_path.display());
}
