use crate::config::types::{
    ApiConfig, Config, HarvestConfig, OutputConfig, StorageBackend, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Upstream ceiling is 12 requests per second
const MIN_REQUEST_INTERVAL_MS: u64 = 84;

/// Largest page size the content API accepts
const MAX_PAGE_SIZE: u32 = 200;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_api_config(&config.api)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates work-queue configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if config.end_date < config.start_date {
        return Err(ConfigError::Validation(format!(
            "end_date ({}) must not be before start_date ({})",
            config.end_date, config.start_date
        )));
    }

    if config.tries_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "tries_threshold must be >= 1, got {}",
            config.tries_threshold
        )));
    }

    if config.min_request_interval_ms < MIN_REQUEST_INTERVAL_MS {
        return Err(ConfigError::Validation(format!(
            "min_request_interval_ms must be >= {}ms, got {}ms",
            MIN_REQUEST_INTERVAL_MS, config.min_request_interval_ms
        )));
    }

    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation("api_key cannot be empty".to_string()));
    }

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.content_type.is_empty() {
        return Err(ConfigError::Validation(
            "content_type cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Name: non-empty, alphanumeric + hyphens only
    if config.name.is_empty() {
        return Err(ConfigError::Validation("name cannot be empty".to_string()));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.root_dir.is_empty() {
        return Err(ConfigError::Validation(
            "root_dir cannot be empty".to_string(),
        ));
    }

    if config.backend == StorageBackend::Sqlite
        && config
            .database_path
            .as_deref()
            .map_or(true, |p| p.is_empty())
    {
        return Err(ConfigError::Validation(
            "database_path is required for the sqlite backend".to_string(),
        ));
    }

    for (name, path) in [
        ("log_path", &config.log_path),
        ("summary_path", &config.summary_path),
    ] {
        if matches!(path.as_deref(), Some("")) {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty when set",
                name
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Must contain exactly one @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
