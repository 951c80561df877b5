use crate::config::types::{Config, DownloadConfig, FetchConfig, OutputConfig, VolumesConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_download_config(&config.download)?;
    validate_output_config(&config.output)?;
    validate_volumes_config(&config.volumes)?;
    Ok(())
}

/// Validates the fetch client configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.backoff_base_ms == 0 {
        return Err(ConfigError::Validation(
            "backoff_base_ms must be >= 1".to_string(),
        ));
    }

    for status in &config.retry_statuses {
        if !(100..=599).contains(status) {
            return Err(ConfigError::Validation(format!(
                "retry_statuses entries must be HTTP status codes, got {}",
                status
            )));
        }
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeouts must be >= 1 second".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values must survive the trip into a reqwest HeaderValue
    for (name, value) in [
        ("user-agent", Some(&config.user_agent)),
        ("accept", Some(&config.accept)),
        ("accept-language", Some(&config.accept_language)),
        ("referer", config.referer.as_ref()),
    ] {
        if let Some(value) = value {
            if value.chars().any(|c| c == '\r' || c == '\n') {
                return Err(ConfigError::Validation(format!(
                    "header '{}' contains line breaks",
                    name
                )));
            }
        }
    }

    Ok(())
}

/// Validates the download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    Ok(())
}

/// Validates the output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    validate_bare_filename("metadata_filename", &config.metadata_filename)?;
    validate_bare_filename("page_source_filename", &config.page_source_filename)?;
    Ok(())
}

/// Validates the volume-discovery configuration
fn validate_volumes_config(config: &VolumesConfig) -> Result<(), ConfigError> {
    if config.link_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "volumes link_marker cannot be empty".to_string(),
        ));
    }

    validate_bare_filename("csv_filename", &config.csv_filename)
}

/// Output filenames are joined onto the output directory; they must not be
/// paths themselves.
fn validate_bare_filename(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }

    if value.contains('/') || value.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{} must be a bare filename, got '{}'",
            field, value
        )));
    }

    Ok(())
}
