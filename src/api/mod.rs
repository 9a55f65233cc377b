//! HTTP surface
//!
//! Two endpoints: `POST /scrape_yts` starts a background run and `GET /`
//! reports the run state together with the last finalized artifact.

mod error;
mod handlers;
mod router;

pub use error::{AppError, AppResult};
pub use handlers::{get_scrape_status, start_scraping, StartResponse, StatusResponse};
pub use router::create_router;

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::output::{JsonMovieStore, MovieStore};
use crate::state::StatusTracker;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Client,
    pub tracker: StatusTracker,
    pub store: Arc<dyn MovieStore>,
}

impl AppState {
    /// Builds the HTTP client and JSON store described by `config`
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn MovieStore> = Arc::new(JsonMovieStore::from_config(&config.output));
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn MovieStore>) -> Result<Self> {
        let client = build_http_client(&config.scraper)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            tracker: StatusTracker::new(),
            store,
        })
    }
}
