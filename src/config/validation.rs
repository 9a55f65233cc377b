use crate::config::types::{Config, OutputConfig, ScraperConfig, ServerConfig};
use crate::{ConfigError, ConfigResult};
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_server_config(&config.server)?;
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> ConfigResult<()> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind_address '{}' is not a socket address: {}",
            config.bind_address, e
        ))
    })?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.listing_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "listing_url '{}' must use http or https",
            config.listing_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_concurrent_details < 1 || config.max_concurrent_details > 16 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_details must be between 1 and 16, got {}",
            config.max_concurrent_details
        )));
    }

    if config.listing_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "listing_retries must be <= 10, got {}",
            config.listing_retries
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.movies_path.is_empty() {
        return Err(ConfigError::Validation(
            "movies_path cannot be empty".to_string(),
        ));
    }

    if config.snapshot_dir.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_dir cannot be empty".to_string(),
        ));
    }

    if config.write_retries < 1 || config.write_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "write_retries must be between 1 and 10, got {}",
            config.write_retries
        )));
    }

    Ok(())
}
