//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the browser-like user agent
//! - GET requests with a bounded per-request timeout
//! - Error classification into typed results
//!
//! The fetcher never retries and never panics: every outcome is a value.

use crate::config::ScraperConfig;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// HTTP status code, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether another attempt could plausibly succeed (transport errors and 5xx)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Success { .. } => false,
            Self::HttpError { status_code } => *status_code >= 500,
            Self::NetworkError { .. } => true,
        }
    }

    /// Short human-readable outcome for log lines
    pub fn describe(&self) -> String {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code } => {
                format!("HTTP {}", status_code)
            }
            Self::NetworkError { error } => error.clone(),
        }
    }

    /// Parses the body of a successful fetch
    ///
    /// `Html` is not `Send`; parse right before extraction and drop it before
    /// the next await point.
    pub fn document(&self) -> Option<Html> {
        match self {
            Self::Success { body, .. } => Some(Html::parse_document(body)),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use mogodum::config::ScraperConfig;
/// use mogodum::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL exactly once
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx with readable body | Success |
/// | Any other HTTP status | HttpError |
/// | Timeout, connection failure, unreadable body | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            tracing::debug!("Fetch of {} failed: {}", url, error);
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Fetch of {} returned HTTP {}", url, status.as_u16());
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}
