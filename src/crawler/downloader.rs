//! Bounded-concurrency download orchestration
//!
//! Tasks flow through a channel into a fixed pool of workers; at most
//! `concurrency` downloads are in flight at once. The bound exists as
//! backpressure toward the source site, not to maximize throughput. Outcomes
//! come back over a result channel in completion order; the caller re-keys
//! them to records by index, so no ordering guarantee is needed here.
//!
//! The [`FileFetcher`] seam lets tests substitute an instrumented fetcher
//! and assert the concurrency bound directly.

use crate::config::FetchConfig;
use crate::crawler::fetcher;
use crate::records::{DownloadOutcome, DownloadTask};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Performs one download task to completion
///
/// Implementations must capture every failure in the returned outcome; a
/// fetch must never panic or error across the task boundary.
pub trait FileFetcher: Send + Sync + 'static {
    fn fetch(&self, task: DownloadTask) -> impl Future<Output = DownloadOutcome> + Send;
}

/// The production fetcher: streams files over the shared HTTP client
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch(&self, task: DownloadTask) -> impl Future<Output = DownloadOutcome> + Send {
        async move { fetcher::fetch_file(&self.client, &self.config, &task).await }
    }
}

/// Runs all download tasks through a fixed worker pool
///
/// Returns exactly one outcome per task; completion order is free. Worker
/// count is `concurrency` capped at the task count.
pub async fn download_all<F: FileFetcher>(
    fetcher: Arc<F>,
    tasks: Vec<DownloadTask>,
    concurrency: usize,
) -> Vec<DownloadOutcome> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let total = tasks.len();
    let workers = concurrency.max(1).min(total);
    tracing::info!(
        "Downloading {} files ({} concurrent downloads)",
        total,
        workers
    );

    let (task_tx, task_rx) = mpsc::channel::<DownloadTask>(total);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<DownloadOutcome>(total);
    let task_rx = Arc::new(Mutex::new(task_rx));

    // The queue is pre-filled and closed before the workers start, so each
    // worker drains until recv() returns None.
    for task in tasks {
        if task_tx.send(task).await.is_err() {
            break;
        }
    }
    drop(task_tx);

    let mut handles = Vec::with_capacity(workers);
    for worker_id in 0..workers {
        let task_rx = Arc::clone(&task_rx);
        let outcome_tx = outcome_tx.clone();
        let fetcher = Arc::clone(&fetcher);

        handles.push(tokio::spawn(async move {
            loop {
                // Hold the queue lock only for the dequeue, not the download
                let task = { task_rx.lock().await.recv().await };
                let Some(task) = task else { break };

                tracing::debug!("Worker {} downloading {}", worker_id, task.url);
                let outcome = fetcher.fetch(task).await;
                if outcome_tx.send(outcome).await.is_err() {
                    break;
                }
            }
        }));
    }
    drop(outcome_tx);

    let progress = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} downloads")
    {
        progress.set_style(style.progress_chars("=> "));
    }

    let mut outcomes = Vec::with_capacity(total);
    while let Some(outcome) = outcome_rx.recv().await {
        progress.inc(1);
        outcomes.push(outcome);
    }
    progress.finish_and_clear();

    for handle in handles {
        let _ = handle.await;
    }

    outcomes
}
