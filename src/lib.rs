//! Mogodum: a movie listing harvester
//!
//! This crate crawls the paginated movie listing of a single site, follows every
//! entry to its detail page (and the linked external metadata page), and
//! persists the assembled records as JSON while exposing run progress over HTTP.

pub mod api;
pub mod config;
pub mod crawler;
pub mod models;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Mogodum operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("A scrape run is already in progress")]
    AlreadyRunning,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Mogodum operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL construction
pub type UrlResult<T> = std::result::Result<T, ::url::ParseError>;

// Re-export commonly used types
pub use config::Config;
pub use models::{Details, DisplayInfo, FetchStatus, Link, ListingEntryStub, Movie, ScrapeRequest};
pub use state::{RunState, StatusTracker};
