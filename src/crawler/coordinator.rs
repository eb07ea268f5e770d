//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Seeding the frontier with the canonical seed URL
//! - Draining the frontier in waves bounded by the concurrency cap
//! - Fetching and extracting every page of a wave concurrently
//! - Feeding discovered links back into the frontier between waves
//! - Writing page files, the corpus and the failure report
//!
//! Each wave is a barrier: the next batch is only drained once every page of the
//! current one has finished, so the frontier has a single writer.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::Frontier;
use crate::crawler::limiter::ConcurrencyLimiter;
use crate::crawler::parser::parse_html;
use crate::output::{FailureRecord, OutputWriter, PageResult};
use crate::url::{extract_domain, parse_seed_url, CrawlContext};
use crate::{SiteCorpusError, UrlError};
use futures::future::join_all;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Canonical seed URL
    pub seed: String,

    /// Domain directory name under the output root
    pub domain: String,

    pub pages_succeeded: usize,
    pub pages_failed: usize,

    /// Distinct URLs dispatched for fetching
    pub pages_visited: usize,

    pub waves: usize,

    /// Failure records in dispatch order
    pub failures: Vec<FailureRecord>,

    pub corpus_path: PathBuf,
    pub failure_report_path: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Result of processing one dispatched URL
#[derive(Debug)]
enum PageOutcome {
    Fetched {
        page: PageResult,
        links: Vec<String>,
    },
    Failed(FailureRecord),
}

/// Main crawler coordinator structure
///
/// Holds all mutable state of one crawl session; nothing is shared between runs.
pub struct Coordinator {
    seed: String,
    domain: String,
    client: Client,
    context: CrawlContext,
    frontier: Frontier,
    limiter: ConcurrencyLimiter,
    writer: OutputWriter,
    failures: Vec<FailureRecord>,
    pages_succeeded: usize,
    waves: usize,
}

impl Coordinator {
    /// Creates a new coordinator for a crawl seeded at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Session ready to run
    /// * `Err(SiteCorpusError)` - Invalid seed URL or HTTP client setup failure
    pub fn new(config: Config, seed: &str) -> Result<Self, SiteCorpusError> {
        let seed_url = parse_seed_url(seed)?;
        let domain = extract_domain(&seed_url).ok_or(UrlError::MissingDomain)?;
        let context = CrawlContext::from_seed(&seed_url);
        let frontier = Frontier::with_seed(seed_url.as_str())?;

        let client = build_http_client(&config)?;
        let limiter = ConcurrencyLimiter::new(config.crawler.max_concurrent_requests as usize);
        let writer = OutputWriter::new(Path::new(&config.output.root_dir), &domain);

        tracing::debug!(
            "Crawl context: base {}, context path {}",
            context.base_url(),
            context.context_path()
        );

        Ok(Self {
            seed: seed_url.to_string(),
            domain,
            client,
            context,
            frontier,
            limiter,
            writer,
            failures: Vec::new(),
            pages_succeeded: 0,
            waves: 0,
        })
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn context(&self) -> &CrawlContext {
        &self.context
    }

    /// Runs the crawl loop until the frontier is empty
    ///
    /// Fetch and parse failures never abort the crawl; they end up in the
    /// failure report. Only failing to write the corpus or the report, or a
    /// broken internal invariant, is returned as an error.
    pub async fn run(mut self) -> Result<CrawlReport, SiteCorpusError> {
        tracing::info!(
            "Starting crawl of {} (max {} concurrent requests)",
            self.seed,
            self.limiter.capacity()
        );
        let start_time = Instant::now();

        while !self.frontier.is_empty() {
            let batch = self.frontier.drain_batch(self.limiter.capacity());
            self.run_wave(batch.into_iter().map(|entry| entry.url).collect())
                .await?;

            tracing::info!(
                "Progress: {} pages crawled, {} failed, {} queued, {} total in frontier",
                self.pages_succeeded,
                self.failures.len(),
                self.frontier.queue_len(),
                self.frontier.total_size()
            );
        }

        let finished = self.writer.finish(&self.failures)?;

        let report = CrawlReport {
            seed: self.seed,
            domain: self.domain,
            pages_succeeded: self.pages_succeeded,
            pages_failed: self.failures.len(),
            pages_visited: self.frontier.visited_count(),
            waves: self.waves,
            failures: self.failures,
            corpus_path: finished.corpus_path,
            failure_report_path: finished.failure_report_path,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages crawled, {} failed in {:?}",
            report.pages_succeeded,
            report.pages_failed,
            report.elapsed
        );

        Ok(report)
    }

    /// Dispatches one drained batch and waits for all of it to finish
    async fn run_wave(&mut self, batch: Vec<String>) -> Result<(), SiteCorpusError> {
        let mut dispatched = Vec::with_capacity(batch.len());
        for url in batch {
            if self.frontier.mark_visited(&url)? {
                dispatched.push(url);
            } else {
                tracing::debug!("Skipping already visited URL: {}", url);
            }
        }

        if dispatched.is_empty() {
            return Ok(());
        }
        self.waves += 1;
        tracing::debug!("Wave {}: dispatching {} URLs", self.waves, dispatched.len());

        let outcomes = {
            let client = &self.client;
            let limiter = &self.limiter;
            let context = &self.context;
            let frontier = &self.frontier;

            join_all(dispatched.iter().map(|url| {
                limiter.run(process_url(client, context, url, frontier.referrer_for(url)))
            }))
            .await
        };

        // join_all keeps dispatch order, which the corpus relies on
        for outcome in outcomes {
            self.record_outcome(outcome?)?;
        }

        Ok(())
    }

    fn record_outcome(&mut self, outcome: PageOutcome) -> Result<(), SiteCorpusError> {
        match outcome {
            PageOutcome::Fetched { page, links } => {
                self.frontier.complete(&page.url, true)?;
                self.pages_succeeded += 1;

                match self.writer.write_page(&page) {
                    Ok(path) => tracing::debug!("Wrote {} to {}", page.url, path.display()),
                    Err(e) => tracing::warn!("Failed to write page {}: {}", page.url, e),
                }
                self.writer.add_to_corpus(&page);

                self.frontier.enqueue(&links, &page.url)?;
            }
            PageOutcome::Failed(record) => {
                self.frontier.complete(&record.url, false)?;
                self.failures.push(record);
            }
        }

        Ok(())
    }
}

/// Fetches and extracts a single URL; run under a limiter slot
async fn process_url(
    client: &Client,
    context: &CrawlContext,
    url: &str,
    referrer: &str,
) -> PageOutcome {
    tracing::debug!("Fetching {}", url);

    let failed = |reason: String| {
        tracing::warn!("Failed to crawl {}: {}", url, reason);
        PageOutcome::Failed(FailureRecord {
            url: url.to_string(),
            reason,
            referrer: referrer.to_string(),
        })
    };

    let fetched = match fetch_page(client, url).await {
        Ok(fetched) => fetched,
        Err(e) => return failed(e.to_string()),
    };

    match parse_html(&fetched.body, url, context) {
        Ok(parsed) => {
            tracing::debug!("Extracted {} in-scope links from {}", parsed.links.len(), url);
            PageOutcome::Fetched {
                page: PageResult {
                    url: url.to_string(),
                    title: parsed.title,
                    content: parsed.markdown,
                },
                links: parsed.links,
            }
        }
        Err(e) => failed(format!("Failed to parse HTML: {}", e)),
    }
}

/// Runs a complete crawl from `seed`
///
/// # Example
///
/// ```no_run
/// use sitecorpus::config::Config;
/// use sitecorpus::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "https://docs.example.com/").await?;
/// println!("{} pages in {}", report.pages_succeeded, report.corpus_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seed: &str) -> Result<CrawlReport, SiteCorpusError> {
    Coordinator::new(config, seed)?.run().await
}
