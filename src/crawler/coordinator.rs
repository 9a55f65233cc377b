//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that drives one run:
//! - Claiming the process-wide tracker
//! - Fetching listing pages with bounded retries
//! - Resolving entries through the detail scheduler
//! - Numbering, accumulating, and snapshotting results
//! - Writing the final artifact and recording the outcome

use crate::config::Config;
use crate::crawler::extract::extract_listing_entries;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::resolver::DetailResolver;
use crate::crawler::scheduler::DetailScheduler;
use crate::models::{ListingEntryStub, Movie, ScrapeRequest};
use crate::output::{compute_statistics, JsonMovieStore, MovieStore, OutputError, OutputResult};
use crate::state::StatusTracker;
use crate::url::listing_page_url;
use crate::{Result, ScrapeError};
use reqwest::Client;
use scraper::Html;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use url::Url;

const WRITE_RETRY_DELAY: Duration = Duration::from_millis(200);

/// One crawl run
///
/// All accumulation state lives here, so two runs never share movies or
/// numbering. The only shared piece is the [`StatusTracker`].
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    tracker: StatusTracker,
    store: Arc<dyn MovieStore>,
    scheduler: DetailScheduler,
    pages_requested: u32,
    movies: Vec<Movie>,
    next_number: u64,
}

impl Coordinator {
    /// Validates the request and claims the tracker for a new run
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - The tracker is now Running and owned by this run
    /// * `Err(ScrapeError::InvalidRequest)` - Bad page count; tracker untouched
    /// * `Err(ScrapeError::UrlParse)` - Unusable listing URL; tracker untouched
    /// * `Err(ScrapeError::AlreadyRunning)` - Another run is active
    pub fn try_start(
        config: Arc<Config>,
        client: Client,
        tracker: StatusTracker,
        store: Arc<dyn MovieStore>,
        request: &ScrapeRequest,
    ) -> Result<Self> {
        let pages_requested = request.page_count()?;
        listing_page_url(&config.scraper.listing_url, 1)?;

        tracker.try_start(pages_requested)?;

        let resolver = DetailResolver::new(client.clone(), config.scraper.resolve_external);
        let scheduler =
            DetailScheduler::new(resolver, config.scraper.max_concurrent_details as usize);

        Ok(Self {
            config,
            client,
            tracker,
            store,
            scheduler,
            pages_requested,
            movies: Vec::new(),
            next_number: 1,
        })
    }

    /// Runs in the background; the returned handle finishes with the run
    ///
    /// Once the run task is gone the tracker is Completed or Failed. A task
    /// that died without recording an outcome is moved to Failed.
    pub fn spawn(self) -> JoinHandle<()> {
        let tracker = self.tracker.clone();
        tokio::spawn(async move {
            let outcome = tokio::spawn(self.run()).await;
            if tracker.current_state().is_terminal() {
                return;
            }

            let reason = match outcome {
                Err(e) => format!("Run aborted: {}", e),
                Ok(_) => "Run ended without recording an outcome".to_string(),
            };
            tracing::error!("Scrape run failed: {}", reason);
            tracker.fail(reason);
        })
    }

    /// Runs the page loop to completion
    ///
    /// Listing and detail failures degrade the result; only persistence
    /// failures end the run early. The tracker is Completed or Failed when
    /// this returns.
    pub async fn run(mut self) -> Result<Vec<Movie>> {
        tracing::info!(
            "Starting scrape run over {} pages ({} detail workers)",
            self.pages_requested,
            self.scheduler.max_concurrent()
        );
        let start_time = Instant::now();

        for page in 1..=self.pages_requested {
            let Some(stubs) = self.fetch_listing(page).await else {
                self.tracker.page_completed(true);
                continue;
            };

            let entry_count = stubs.len();
            let resolved = self.scheduler.resolve_all(stubs).await;
            for mut movie in resolved {
                movie.number = self.next_number;
                self.next_number += 1;
                self.movies.push(movie);
            }

            tracing::info!(
                "Page {}/{}: {} entries, {} movies so far",
                page,
                self.pages_requested,
                entry_count,
                self.movies.len()
            );

            if let Err(e) = self.snapshot(page).await {
                if self.config.output.persistence_mandatory {
                    return Err(self.abort(format!("Snapshot of page {} failed: {}", page, e), e));
                }
                tracing::error!("Snapshot of page {} failed, continuing: {}", page, e);
            }

            self.tracker.page_completed(false);
        }

        if let Err(e) = self.finalize().await {
            return Err(self.abort(format!("Writing final artifact failed: {}", e), e));
        }

        let stats = compute_statistics(&self.movies);
        tracing::info!(
            "Scrape run completed in {:?} over {} pages: {} movies ({} resolved, {} detail unreachable, {} external unreachable)",
            start_time.elapsed(),
            self.tracker.current_state().pages_completed(),
            stats.total_movies,
            stats.resolved,
            stats.detail_unreachable,
            stats.external_unreachable
        );

        self.tracker.complete(self.movies.len());
        Ok(self.movies)
    }

    /// Fetches and parses one listing page
    ///
    /// Returns None when the page could not be fetched after retries.
    async fn fetch_listing(&self, page: u32) -> Option<Vec<ListingEntryStub>> {
        let url = match listing_page_url(&self.config.scraper.listing_url, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build URL for listing page {}: {}", page, e);
                return None;
            }
        };

        match self.fetch_with_retries(&url).await {
            FetchResult::Success {
                final_url, body, ..
            } => {
                let base = Url::parse(&final_url).unwrap_or(url);
                let stubs = parse_listing(&body, &base);
                if stubs.is_empty() {
                    tracing::warn!("Listing page {} ({}) has no entries", page, base);
                }
                Some(stubs)
            }
            failure => {
                tracing::warn!(
                    "Listing page {} ({}) failed: {}",
                    page,
                    url,
                    failure.describe()
                );
                None
            }
        }
    }

    /// Retries transport failures and 5xx; anything else is final
    async fn fetch_with_retries(&self, url: &Url) -> FetchResult {
        let retries = self.config.scraper.listing_retries;
        let delay = Duration::from_millis(self.config.scraper.retry_delay_ms);
        let mut attempt = 0;

        loop {
            let result = fetch_url(&self.client, url.as_str()).await;
            if result.is_success() && attempt > 0 {
                tracing::debug!("{} succeeded after {} retries", url, attempt);
            }
            if !result.is_transient() || attempt >= retries {
                return result;
            }

            attempt += 1;
            tracing::debug!(
                "Retrying {} ({}/{}) after {}",
                url,
                attempt,
                retries,
                result.describe()
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn snapshot(&self, page: u32) -> OutputResult<PathBuf> {
        let store = Arc::clone(&self.store);
        let movies = self.movies.clone();
        with_write_retries(self.config.output.write_retries, move || {
            store.snapshot(page, &movies)
        })
        .await
    }

    async fn finalize(&self) -> OutputResult<PathBuf> {
        let store = Arc::clone(&self.store);
        let movies = self.movies.clone();
        with_write_retries(self.config.output.write_retries, move || store.finalize(&movies)).await
    }

    fn abort<E: Into<ScrapeError>>(&self, reason: String, error: E) -> ScrapeError {
        tracing::error!("Scrape run failed: {}", reason);
        self.tracker.fail(reason);
        error.into()
    }
}

fn parse_listing(body: &str, base: &Url) -> Vec<ListingEntryStub> {
    let document = Html::parse_document(body);
    extract_listing_entries(&document, base)
}

/// Runs a blocking write on the blocking pool, retrying up to `attempts` times
async fn with_write_retries<T, F>(attempts: u32, mut write: F) -> OutputResult<T>
where
    F: FnMut() -> OutputResult<T> + Send + 'static,
    T: Send + 'static,
{
    let attempts = attempts.max(1);

    tokio::task::spawn_blocking(move || {
        let mut attempt = 1;
        loop {
            match write() {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts => {
                    tracing::warn!("Write attempt {}/{} failed: {}", attempt, attempts, e);
                    attempt += 1;
                    std::thread::sleep(WRITE_RETRY_DELAY);
                }
                Err(e) => return Err(e),
            }
        }
    })
    .await
    .map_err(|e| OutputError::Write(format!("Write task failed: {}", e)))?
}

/// Runs a complete scrape in the foreground
///
/// Builds the client and JSON store from `config`, then runs `pages` listing
/// pages on a fresh tracker.
pub async fn run_crawl(config: Config, pages: u32) -> Result<Vec<Movie>> {
    let client = build_http_client(&config.scraper)?;
    let store: Arc<dyn MovieStore> = Arc::new(JsonMovieStore::from_config(&config.output));
    let tracker = StatusTracker::new();

    let coordinator = Coordinator::try_start(
        Arc::new(config),
        client,
        tracker,
        store,
        &ScrapeRequest::new(i64::from(pages)),
    )?;
    coordinator.run().await
}
