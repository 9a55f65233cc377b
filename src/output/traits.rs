//! Persister trait and error types
//!
//! This module defines the trait interface for movie persistence backends
//! and the associated error types.

use crate::models::Movie;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OutputError {
    /// True when the artifact simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for movie persistence backends
///
/// Implementations must be shareable between the background run and the
/// status endpoint.
pub trait MovieStore: Send + Sync {
    /// Writes every movie resolved through `page` (1-based), replacing any
    /// earlier snapshot for that page
    ///
    /// # Returns
    ///
    /// The location the snapshot was written to
    fn snapshot(&self, page: u32, movies: &[Movie]) -> OutputResult<PathBuf>;

    /// Writes the consolidated artifact at the well-known location
    fn finalize(&self, movies: &[Movie]) -> OutputResult<PathBuf>;

    /// Reads the last consolidated artifact back
    fn load(&self) -> OutputResult<Vec<Movie>>;
}
