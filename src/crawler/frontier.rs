//! Crawl frontier: the FIFO queue of discovered URLs plus visit bookkeeping
//!
//! The frontier owns three pieces of state for one crawl session:
//! - the FIFO queue of entries waiting to be dispatched
//! - the visited set of URLs already dispatched for fetching
//! - the referrer map recording the first page each URL was discovered on
//!
//! It is only mutated by the coordinator between waves, so it needs no locking.

use crate::state::PageState;
use crate::SiteCorpusError;
use std::collections::{HashMap, HashSet, VecDeque};

/// Referrer recorded for the seed URL
pub const SEED_REFERRER: &str = "Initial URL";

/// A canonical URL waiting in the frontier, with the page it was first found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL (dedup key)
    pub url: String,

    /// First referrer, or [`SEED_REFERRER`] for the seed
    pub referrer: String,
}

/// Frontier for a single crawl session
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be dispatched, in discovery order
    queue: VecDeque<FrontierEntry>,

    /// URLs already dispatched; entries are never removed
    visited: HashSet<String>,

    /// Canonical URL -> first referrer; insert-only
    referrers: HashMap<String, String>,

    /// Canonical URL -> current pipeline state
    states: HashMap<String, PageState>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed URL
    pub fn with_seed(seed: &str) -> Result<Self, SiteCorpusError> {
        let mut frontier = Self::new();
        frontier.enqueue([seed], SEED_REFERRER)?;
        Ok(frontier)
    }

    /// Adds newly discovered links found on `referrer`
    ///
    /// A link is skipped when it already has a recorded referrer or was already
    /// visited, so the first referrer seen for a URL always wins.
    ///
    /// # Returns
    ///
    /// The number of links actually appended to the queue
    pub fn enqueue<I, S>(&mut self, links: I, referrer: &str) -> Result<usize, SiteCorpusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;

        for link in links {
            let link = link.as_ref();
            if self.visited.contains(link) || self.referrers.contains_key(link) {
                continue;
            }

            self.referrers
                .insert(link.to_string(), referrer.to_string());
            self.states.insert(link.to_string(), PageState::Discovered);
            self.transition(link, PageState::Queued)?;

            self.queue.push_back(FrontierEntry {
                url: link.to_string(),
                referrer: referrer.to_string(),
            });
            added += 1;
        }

        if added > 0 {
            tracing::debug!("Enqueued {} new URLs from {}", added, referrer);
        }

        Ok(added)
    }

    /// Removes up to `n` entries from the front of the queue
    pub fn drain_batch(&mut self, n: usize) -> Vec<FrontierEntry> {
        let count = n.min(self.queue.len());
        self.queue.drain(..count).collect()
    }

    /// Marks a URL as dispatched
    ///
    /// Idempotent: returns `Ok(true)` the first time a URL is marked and
    /// `Ok(false)` afterwards, so a duplicate entry drained later is discarded
    /// instead of being fetched twice.
    pub fn mark_visited(&mut self, url: &str) -> Result<bool, SiteCorpusError> {
        if self.visited.contains(url) {
            return Ok(false);
        }

        self.transition(url, PageState::Visited)?;
        self.visited.insert(url.to_string());
        Ok(true)
    }

    /// Records the terminal outcome for a dispatched URL
    pub fn complete(&mut self, url: &str, succeeded: bool) -> Result<(), SiteCorpusError> {
        let next = if succeeded {
            PageState::Succeeded
        } else {
            PageState::Failed
        };
        self.transition(url, next)
    }

    /// The first referrer recorded for `url`, or [`SEED_REFERRER`] if none
    pub fn referrer_for(&self, url: &str) -> &str {
        self.referrers
            .get(url)
            .map(String::as_str)
            .unwrap_or(SEED_REFERRER)
    }

    /// Current state of `url`, if it was ever discovered
    pub fn state_of(&self, url: &str) -> Option<PageState> {
        self.states.get(url).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Total frontier size for progress reporting: queued plus visited
    pub fn total_size(&self) -> usize {
        self.queue.len() + self.visited.len()
    }

    fn transition(&mut self, url: &str, next: PageState) -> Result<(), SiteCorpusError> {
        let current = self.states.get(url).copied().unwrap_or(PageState::Discovered);

        if !current.can_transition_to(next) {
            return Err(SiteCorpusError::InvalidTransition {
                url: url.to_string(),
                from: current,
                to: next,
            });
        }

        self.states.insert(url.to_string(), next);
        Ok(())
    }
}
