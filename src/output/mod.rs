//! Output module for persisting crawl results
//!
//! This module handles:
//! - Per-page snapshots and the consolidated movie artifact
//! - Reading the artifact back for the status endpoint
//! - Statistics over persisted records

mod json;
pub mod stats;
mod traits;

pub use json::JsonMovieStore;
pub use stats::{compute_statistics, print_statistics, MovieStatistics};
pub use traits::{MovieStore, OutputError, OutputResult};
