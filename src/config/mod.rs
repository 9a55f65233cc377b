//! Configuration module for Mogodum
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the crate also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use mogodum::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mogodum.toml")).unwrap();
//! println!("Detail workers per page: {}", config.scraper.max_concurrent_details);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, OutputConfig, ScraperConfig, ServerConfig, DEFAULT_USER_AGENT};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
