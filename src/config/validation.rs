use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, PROXY_PLACEHOLDER};
use crate::url::{normalize, parse_seed};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the worker count
pub const MAX_CONCURRENCY: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    // max_depth and crawl_delay >= 0 always hold for unsigned fields

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    let seed = parse_seed(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed_url '{}': {}", config.seed_url, e)))?;

    if let Some(template) = &config.proxy_template {
        validate_proxy_template(template)?;
    }

    for known in &config.known_urls {
        if normalize(known, seed.resolved()).is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Invalid known URL '{}'",
                known
            )));
        }
    }

    if let Some(extensions) = &config.asset_extensions {
        if let Some(bad) = extensions.iter().find(|ext| !is_valid_extension(ext)) {
            return Err(ConfigError::Validation(format!(
                "asset extension '{}' must be alphanumeric",
                bad
            )));
        }
    }

    Ok(())
}

/// Validates a proxy URL pattern
///
/// The template must contain the `{url}` placeholder and must form a valid
/// absolute URL once a target is substituted.
pub fn validate_proxy_template(template: &str) -> ConfigResult<()> {
    if !template.contains(PROXY_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "proxy_template must contain {}, got '{}'",
            PROXY_PLACEHOLDER, template
        )));
    }

    let probe = template.replace(PROXY_PLACEHOLDER, "https%3A%2F%2Fexample.com%2F");
    Url::parse(&probe)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy_template '{}': {}", template, e)))?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
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

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn is_valid_extension(ext: &str) -> bool {
    let ext = ext.trim().trim_start_matches('.');
    !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
