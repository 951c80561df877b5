use serde::Deserialize;

/// Main configuration structure for Offprint
///
/// Every section is optional in the TOML file; omitted sections fall back to
/// the documented defaults, so running without a config file is supported.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub volumes: VolumesConfig,
}

/// Fetch client behavior: retry policy and request identity
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Extra attempts after the first failed request
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles per attempt
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// HTTP status codes that trigger a retry
    #[serde(rename = "retry-statuses", default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Browser-like user agent; the target site rejects default automated
    /// client identities
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept header sent with every request
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    /// Optional Referer header, typically the journal's front page
    #[serde(default)]
    pub referer: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            retry_statuses: default_retry_statuses(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            referer: None,
        }
    }
}

/// Download orchestration behavior
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Fixed worker-pool size; at most this many downloads are in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Output file naming
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Name of the serialized record file inside the output directory
    #[serde(rename = "metadata-filename", default = "default_metadata_filename")]
    pub metadata_filename: String,

    /// Whether to keep a copy of the fetched listing page for debugging
    #[serde(rename = "save-page-source", default = "default_save_page_source")]
    pub save_page_source: bool,

    /// Name of the saved listing page copy
    #[serde(
        rename = "page-source-filename",
        default = "default_page_source_filename"
    )]
    pub page_source_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metadata_filename: default_metadata_filename(),
            save_page_source: default_save_page_source(),
            page_source_filename: default_page_source_filename(),
        }
    }
}

/// Volume-index discovery behavior
#[derive(Debug, Clone, Deserialize)]
pub struct VolumesConfig {
    /// Substring that identifies a volume link's href on the index page
    #[serde(rename = "link-marker", default = "default_link_marker")]
    pub link_marker: String,

    /// Name of the CSV written by volume discovery
    #[serde(rename = "csv-filename", default = "default_csv_filename")]
    pub csv_filename: String,
}

impl Default for VolumesConfig {
    fn default() -> Self {
        Self {
            link_marker: default_link_marker(),
            csv_filename: default_csv_filename(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    300
}

fn default_retry_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.5".to_string()
}

fn default_concurrency() -> usize {
    8
}

fn default_metadata_filename() -> String {
    "metadata.json".to_string()
}

fn default_save_page_source() -> bool {
    true
}

fn default_page_source_filename() -> String {
    "page_source.html".to_string()
}

fn default_link_marker() -> String {
    "volume-list.php?volume=".to_string()
}

fn default_csv_filename() -> String {
    "volumes.csv".to_string()
}
