//! Resilient HTTP fetch client
//!
//! One long-lived connection pool serves both the page fetch and every file
//! download. All requests carry a fixed browser-like header set (the target
//! site rejects default automated client identities) and share one retry
//! policy: transient statuses and connection failures are retried with
//! exponential backoff, GET only.
//!
//! Page fetch failures abort the run and are classified for operator
//! messaging; file download failures are captured into a
//! [`DownloadOutcome`] and never crash the batch.

use crate::config::FetchConfig;
use crate::crawler::filetype;
use crate::records::{DownloadOutcome, DownloadTask};
use crate::{CrawlError, DownloadError, FetchError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT};
use reqwest::{Client, Response};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Write-buffer size for streaming downloads; bounds memory per worker
/// regardless of document size.
const WRITE_BUFFER_BYTES: usize = 8 * 1024;

/// Builds the shared HTTP client from an explicit fetch configuration
///
/// # Example
///
/// ```
/// use offprint::config::FetchConfig;
/// use offprint::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, CrawlError> {
    let mut headers = HeaderMap::new();

    let header = |name: &str, value: &str| -> Result<HeaderValue, CrawlError> {
        HeaderValue::from_str(value).map_err(|_| CrawlError::InvalidHeader {
            name: name.to_string(),
        })
    };

    headers.insert(USER_AGENT, header("user-agent", &config.user_agent)?);
    headers.insert(ACCEPT, header("accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header("accept-language", &config.accept_language)?,
    );
    if let Some(referer) = &config.referer {
        headers.insert(REFERER, header("referer", referer)?);
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches the listing page body as text
///
/// Any failure here is fatal to the crawl run; the error variant tells the
/// operator whether the site returned an HTTP error, refused the connection,
/// or timed out.
pub async fn fetch_page(client: &Client, config: &FetchConfig, url: &Url) -> Result<String, FetchError> {
    let response = send_with_retry(client, config, url).await?;
    response.text().await.map_err(|e| classify_error(url, e))
}

/// Downloads one article file, streaming the body to disk
///
/// The true extension is resolved from the response content-type (falling
/// back to the URL, then `pdf`) and the provisional path is rewritten before
/// the first byte is written. Every failure is converted into a failed
/// outcome; this function never returns an error.
pub async fn fetch_file(client: &Client, config: &FetchConfig, task: &DownloadTask) -> DownloadOutcome {
    match stream_to_disk(client, config, task).await {
        Ok((path, extension)) => DownloadOutcome::completed(task, path, extension),
        Err(e) => {
            tracing::warn!("Download failed for {}: {}", task.url, e);
            DownloadOutcome::failed(task, e.to_string())
        }
    }
}

async fn stream_to_disk(
    client: &Client,
    config: &FetchConfig,
    task: &DownloadTask,
) -> Result<(PathBuf, &'static str), DownloadError> {
    let mut response = send_with_retry(client, config, &task.url).await?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let extension = filetype::resolve_extension(content_type.as_deref(), &task.url);
    let path = task.save_path.with_extension(extension);

    let file = tokio::fs::File::create(&path)
        .await
        .map_err(|source| DownloadError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| classify_error(&task.url, e))?
    {
        writer
            .write_all(&chunk)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.display().to_string(),
                source,
            })?;
    }

    writer.flush().await.map_err(|source| DownloadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok((path, extension))
}

/// Sends a GET request, retrying transient failures with exponential backoff
///
/// Retryable: connection failures, timeouts, and the configured status codes
/// (429/5xx by default). Each retry doubles the delay, starting at
/// `backoff-base-ms`. Non-success statuses that survive all retry attempts
/// become [`FetchError::Http`].
async fn send_with_retry(
    client: &Client,
    config: &FetchConfig,
    url: &Url,
) -> Result<Response, FetchError> {
    let mut attempt: u32 = 0;

    loop {
        let result = client.get(url.clone()).send().await;

        let retryable = match &result {
            Ok(response) => config.retry_statuses.contains(&response.status().as_u16()),
            Err(e) => e.is_connect() || e.is_timeout(),
        };

        if retryable && attempt < config.max_retries {
            let delay = Duration::from_millis(config.backoff_base_ms << attempt.min(16));
            tracing::debug!(
                "Transient failure for {}, retrying in {:?} ({}/{})",
                url,
                delay,
                attempt + 1,
                config.max_retries
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        return match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    Ok(response)
                } else {
                    Err(FetchError::Http {
                        url: url.to_string(),
                        status: status.as_u16(),
                    })
                }
            }
            Err(e) => Err(classify_error(url, e)),
        };
    }
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            source: error,
        }
    } else {
        FetchError::Other {
            url: url.to_string(),
            source: error,
        }
    }
}
