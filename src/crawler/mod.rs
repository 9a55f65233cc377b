//! Crawler module for listing traversal and record assembly
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with typed outcomes
//! - Field extraction from listing, detail, and external pages
//! - Per-entry detail resolution with failure isolation
//! - Bounded parallel resolution per listing page
//! - Overall run coordination

mod coordinator;
pub mod extract;
mod fetcher;
mod resolver;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use resolver::DetailResolver;
pub use scheduler::DetailScheduler;
