//! Sitecorpus: a single-domain documentation crawler
//!
//! This crate crawls every page reachable within one web domain from a seed URL,
//! converts each page to Markdown, mirrors the pages on disk and produces a single
//! concatenated corpus file plus a structured failure report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sitecorpus operations
#[derive(Debug, Error)]
pub enum SiteCorpusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition for {url}: {from:?} -> {to:?}")]
    InvalidTransition {
        url: String,
        from: state::PageState,
        to: state::PageState,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Concurrency limiter closed")]
    LimiterClosed,
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Reasons a single page could not be fetched
///
/// The `Display` text is what ends up in the `reason` field of the failure report.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Result type alias for Sitecorpus operations
pub type Result<T> = std::result::Result<T, SiteCorpusError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlReport};
pub use output::{clean_content, rebuild_corpus, FailureRecord, PageResult};
pub use state::PageState;
pub use url::{is_in_scope, normalize_href, CrawlContext};
