//! Configuration module for Sitecorpus
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a crawl can run without one.
//!
//! # Example
//!
//! ```no_run
//! use sitecorpus::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitecorpus.toml")).unwrap();
//! println!("Concurrency cap: {}", config.crawler.max_concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
