//! Bounded worker pool for detail resolution
//!
//! This module handles:
//! - Spawning one resolution task per listing entry
//! - Global concurrency limiting via a semaphore
//! - Reassembling results in the original listing order

use crate::crawler::resolver::DetailResolver;
use crate::models::{FetchStatus, ListingEntryStub, Movie};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Resolves the entries of one listing page with bounded parallelism
#[derive(Debug, Clone)]
pub struct DetailScheduler {
    /// Caps the number of detail resolutions in flight
    semaphore: Arc<Semaphore>,

    resolver: Arc<DetailResolver>,

    max_concurrent: usize,
}

impl DetailScheduler {
    /// Creates a scheduler allowing at most `max_concurrent` resolutions at
    /// once (a value of 0 is treated as 1)
    pub fn new(resolver: DetailResolver, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            resolver: Arc::new(resolver),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Resolves every stub and returns the movies in input order
    ///
    /// Completion order does not matter: results are collected by awaiting
    /// the task handles in the order the stubs were given. A task that panics
    /// degrades its entry to `DetailUnreachable` instead of losing it.
    pub async fn resolve_all(&self, stubs: Vec<ListingEntryStub>) -> Vec<Movie> {
        let handles: Vec<(ListingEntryStub, JoinHandle<Movie>)> = stubs
            .into_iter()
            .map(|stub| {
                let semaphore = Arc::clone(&self.semaphore);
                let resolver = Arc::clone(&self.resolver);
                let task_stub = stub.clone();

                let handle = tokio::spawn(async move {
                    // The semaphore is never closed; an error only means no limit.
                    let _permit = semaphore.acquire_owned().await.ok();
                    resolver.resolve(&task_stub).await
                });

                (stub, handle)
            })
            .collect();

        let mut movies = Vec::with_capacity(handles.len());
        for (stub, handle) in handles {
            match handle.await {
                Ok(movie) => movies.push(movie),
                Err(e) => {
                    tracing::error!("Resolution task for {} failed: {}", stub.detail_url, e);
                    let mut movie = Movie::from_stub(&stub);
                    movie.fetch_status = FetchStatus::DetailUnreachable { code: None };
                    movies.push(movie);
                }
            }
        }

        movies
    }
}
