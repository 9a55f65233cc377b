use serde::Deserialize;

/// Browser-like identification sent with every request; the target site
/// rejects default client agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Main configuration structure for Mogodum
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP surface configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the status/trigger endpoints listen on
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5100".to_string(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing endpoint; the page index is appended as `?page=N`
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout for a single request (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Number of detail pages resolved concurrently for one listing page
    #[serde(rename = "max-concurrent-details")]
    pub max_concurrent_details: u32,

    /// Whether to follow the external metadata link for poster images
    #[serde(rename = "resolve-external")]
    pub resolve_external: bool,

    /// Extra attempts for a listing page that failed transiently
    #[serde(rename = "listing-retries")]
    pub listing_retries: u32,

    /// Delay between listing page attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://yts.mx/browse-movies".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_concurrent_details: 2,
            resolve_external: true,
            listing_retries: 2,
            retry_delay_ms: 1000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the consolidated artifact read by the status endpoint
    #[serde(rename = "movies-path")]
    pub movies_path: String,

    /// Directory receiving one snapshot per listing page
    #[serde(rename = "snapshot-dir")]
    pub snapshot_dir: String,

    /// Attempts per artifact write before giving up
    #[serde(rename = "write-retries")]
    pub write_retries: u32,

    /// Fail the run when a page snapshot cannot be written
    #[serde(rename = "persistence-mandatory")]
    pub persistence_mandatory: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            movies_path: "movies.json".to_string(),
            snapshot_dir: "movies".to_string(),
            write_retries: 3,
            persistence_mandatory: false,
        }
    }
}
