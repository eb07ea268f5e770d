/// Page state definitions for tracking crawl progress
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Link was found on a page and passed the scope check
    Discovered,

    /// Link sits in the frontier queue
    Queued,

    /// Page was drained from the frontier and dispatched for fetching
    Visited,

    // ===== Terminal States =====
    /// Page was fetched, converted and written
    Succeeded,

    /// Page fetch or parse failed; recorded in the failure report
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true if the page may move from this state to `next`
    ///
    /// Only forward moves along the crawl pipeline are allowed; there are no
    /// retries, so nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        if self.is_terminal() {
            return false;
        }

        matches!(
            (self, next),
            (Self::Discovered, Self::Queued)
                | (Self::Queued, Self::Visited)
                | (Self::Visited, Self::Succeeded)
                | (Self::Visited, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Queued => "queued",
            Self::Visited => "visited",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
