//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier of discovered URLs and visit bookkeeping
//! - The concurrency limiter gating fetches
//! - HTTP fetching and HTML extraction
//! - Overall crawl coordination in waves

mod coordinator;
mod fetcher;
mod frontier;
mod limiter;
mod parser;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::{Frontier, FrontierEntry, SEED_REFERRER};
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use parser::{parse_html, ParsedPage};

use crate::config::Config;
use crate::SiteCorpusError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Canonicalize the seed and build the crawl context
/// 2. Build the HTTP client
/// 3. Crawl the seed's domain wave by wave
/// 4. Write page files, the corpus file and the failure report
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, SiteCorpusError> {
    run_crawl(config, seed).await
}
