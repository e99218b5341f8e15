use crate::config::types::{ArchiveConfig, Config, OutputConfig, SchedulerConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on simultaneous links, to stay polite to the archive
const MAX_CONCURRENT_SAVES_LIMIT: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_archive_config(&config.archive)?;
    validate_scheduler_config(&config.scheduler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates endpoints and time budgets
fn validate_archive_config(config: &ArchiveConfig) -> ConfigResult<()> {
    validate_endpoint("save-endpoint", &config.save_endpoint)?;
    validate_endpoint("availability-endpoint", &config.availability_endpoint)?;

    for (name, value) in [
        ("submit-timeout-ms", config.submit_timeout_ms),
        ("availability-timeout-ms", config.availability_timeout_ms),
        ("preserve-deadline-ms", config.preserve_deadline_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than 0",
                name
            )));
        }
    }

    if config.poll_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "poll-attempts must be >= 1, got {}",
            config.poll_attempts
        )));
    }

    Ok(())
}

/// Validates worker pool configuration
fn validate_scheduler_config(config: &SchedulerConfig) -> ConfigResult<()> {
    if config.max_concurrent_saves < 1 || config.max_concurrent_saves > MAX_CONCURRENT_SAVES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-saves must be between 1 and {}, got {}",
            MAX_CONCURRENT_SAVES_LIMIT, config.max_concurrent_saves
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that an endpoint is an absolute HTTP(S) URL
fn validate_endpoint(name: &str, endpoint: &str) -> ConfigResult<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            name, endpoint
        )));
    }

    Ok(())
}
