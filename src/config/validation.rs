use crate::config::types::{Config, CrawlerConfig, OutputConfig, PolitenessConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_politeness_config(&config.politeness)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt agent token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler-version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

/// Validates network bounds
fn validate_politeness_config(config: &PolitenessConfig) -> Result<(), ConfigError> {
    if config.robots_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "robots-timeout-ms must be >= 100ms, got {}ms",
            config.robots_timeout_ms
        )));
    }

    if config.sitemap_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "sitemap-timeout-ms must be >= 100ms, got {}ms",
            config.sitemap_timeout_ms
        )));
    }

    if config.max_sitemap_depth > 16 {
        return Err(ConfigError::Validation(format!(
            "max-sitemap-depth must be <= 16, got {}",
            config.max_sitemap_depth
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "snapshot-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
