use crate::config::types::{Config, CrawlerConfig, OutputConfig, TargetEntry, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_per_domain < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_domain must be >= 1, got {}",
            config.max_pages_per_domain
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.sitemap_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "sitemap_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.contact.trim().is_empty() {
        return Err(ConfigError::Validation(
            "contact cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.ledger_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "ledger_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl targets: at least one, each an http(s) URL with a host
fn validate_targets(targets: &[TargetEntry]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[target]] is required".to_string(),
        ));
    }

    for target in targets {
        let url = Url::parse(&target.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base URL '{}': {}", target.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Base URL '{}' must use http or https",
                target.base_url
            )));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidUrl(format!(
                "Base URL '{}' has no host",
                target.base_url
            )));
        }
    }

    Ok(())
}
