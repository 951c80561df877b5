//! Crawl session coordinator
//!
//! Owns the end-to-end sequencing of one run: fetch page, extract fields,
//! correlate into records, download with bounded concurrency, mine the
//! downloaded documents, serialize everything. Stages are separated by
//! barriers; only the download phase runs in parallel. The coordinator
//! retries nothing itself; retries live in the fetch client, and per-record
//! failures surface as empty fields in the output, never as a run abort.

use crate::config::Config;
use crate::crawler::correlator::{correlate, Correlation};
use crate::crawler::downloader::{download_all, HttpFetcher};
use crate::crawler::extractor::extract_fields;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::volumes::{extract_volume_links, write_volume_csv};
use crate::miner;
use crate::output::{write_metadata, CrawlReport, RecordFailure};
use crate::CrawlError;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Main coordinator for one crawl run
pub struct Coordinator {
    config: Config,
    client: Client,
    page_url: Url,
    output_dir: PathBuf,
}

impl Coordinator {
    /// Creates a coordinator and its shared HTTP client
    pub fn new(config: Config, page_url: Url, output_dir: PathBuf) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.fetch)?;
        Ok(Self {
            config,
            client,
            page_url,
            output_dir,
        })
    }

    /// Runs the full pipeline and returns the run report
    ///
    /// Fatal errors: the initial page fetch failing in any way, or the page
    /// yielding zero topic fragments. Everything after that degrades
    /// per-record.
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let started_at = Utc::now();
        std::fs::create_dir_all(&self.output_dir)?;

        tracing::info!("Fetching content from {}", self.page_url);
        let body = fetch_page(&self.client, &self.config.fetch, &self.page_url).await?;

        if self.config.output.save_page_source {
            let debug_path = self
                .output_dir
                .join(&self.config.output.page_source_filename);
            std::fs::write(&debug_path, &body)?;
            tracing::debug!("Saved page source to {}", debug_path.display());
        }

        // Html is parsed and dropped inside this block; only the owned field
        // lists cross the await points below.
        let fields = {
            let document = Html::parse_document(&body);
            extract_fields(&document)
        };
        tracing::info!("Found {}", fields.summary());

        if fields.topics.is_empty() {
            return Err(CrawlError::NoArticles {
                url: self.page_url.to_string(),
            });
        }

        let Correlation { mut records, tasks } =
            correlate(&fields, &self.page_url, &self.output_dir);
        let tasks_submitted = tasks.len();

        // Records the correlator could not build a task for
        let tasked: HashSet<usize> = tasks.iter().map(|t| t.index).collect();
        let mut failures: Vec<RecordFailure> = records
            .iter()
            .enumerate()
            .filter(|(index, _)| !tasked.contains(index))
            .map(|(_, record)| RecordFailure {
                title: record.title.clone(),
                reason: "no download link found".to_string(),
            })
            .collect();

        // Download phase: the only parallel stage, ends at a barrier
        let fetcher = Arc::new(HttpFetcher::new(
            self.client.clone(),
            self.config.fetch.clone(),
        ));
        let outcomes = download_all(fetcher, tasks, self.config.download.concurrency).await;

        let mut successes: Vec<(usize, PathBuf)> = Vec::new();
        for outcome in &outcomes {
            if outcome.success {
                // The true extension is only known now; rewrite the record's
                // provisional path
                records[outcome.index].file_path = outcome.path.display().to_string();
                successes.push((outcome.index, outcome.path.clone()));
            } else {
                failures.push(RecordFailure {
                    title: records[outcome.index].title.clone(),
                    reason: outcome
                        .error
                        .clone()
                        .unwrap_or_else(|| "unknown download error".to_string()),
                });
            }
        }
        tracing::info!("Downloaded {}/{} files", successes.len(), tasks_submitted);

        // Mining phase: sequential over every successful download
        let mut files_mined = 0;
        if !successes.is_empty() {
            tracing::info!("Extracting metadata from {} downloaded files", successes.len());
            let progress = ProgressBar::new(successes.len() as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} mined")
            {
                progress.set_style(style.progress_chars("=> "));
            }

            for (index, path) in &successes {
                let mined = miner::mine(path);
                records[*index].keywords = mined.keywords.join(", ");
                records[*index].email = mined.emails.join(", ");
                files_mined += 1;
                progress.inc(1);
            }
            progress.finish_and_clear();
        }

        // All records are serialized, downloaded or not
        let metadata_path = self.output_dir.join(&self.config.output.metadata_filename);
        write_metadata(&records, &metadata_path)?;
        tracing::info!("Metadata saved to {}", metadata_path.display());

        Ok(CrawlReport {
            page_url: self.page_url.to_string(),
            started_at,
            finished_at: Utc::now(),
            articles_found: records.len(),
            tasks_submitted,
            downloads_succeeded: successes.len(),
            downloads_failed: outcomes.len() - successes.len(),
            failures,
            files_mined,
            pdf_count: count_extension(&successes, "pdf"),
            docx_count: count_extension(&successes, "docx"),
            metadata_path,
        })
    }

    /// Discovers volume links on the page and writes them as CSV
    ///
    /// Alternative entry point used by `--discover-volumes`; shares the fetch
    /// client and its retry policy with the crawl path.
    pub async fn discover_volumes(&self) -> Result<PathBuf, CrawlError> {
        std::fs::create_dir_all(&self.output_dir)?;

        tracing::info!("Fetching volume index from {}", self.page_url);
        let body = fetch_page(&self.client, &self.config.fetch, &self.page_url).await?;

        let links = {
            let document = Html::parse_document(&body);
            extract_volume_links(&document, &self.page_url, &self.config.volumes.link_marker)
        };
        tracing::info!("Found {} volume links", links.len());

        let csv_path = self.output_dir.join(&self.config.volumes.csv_filename);
        write_volume_csv(&links, &csv_path)?;
        Ok(csv_path)
    }
}

fn count_extension(successes: &[(usize, PathBuf)], extension: &str) -> usize {
    successes
        .iter()
        .filter(|(_, path)| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false)
        })
        .count()
}

/// Runs a complete crawl with a fresh coordinator
///
/// # Example
///
/// ```no_run
/// use offprint::config::Config;
/// use offprint::crawler::crawl;
/// use std::path::PathBuf;
/// use url::Url;
///
/// # async fn example() -> offprint::Result<()> {
/// let url = Url::parse("https://journal.example.org/volume-list.php?volume=12").unwrap();
/// let report = crawl(Config::default(), url, PathBuf::from("./volume12")).await?;
/// println!("Downloaded {} files", report.downloads_succeeded);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: Config,
    page_url: Url,
    output_dir: impl AsRef<Path>,
) -> Result<CrawlReport, CrawlError> {
    let coordinator = Coordinator::new(config, page_url, output_dir.as_ref().to_path_buf())?;
    coordinator.run().await
}
