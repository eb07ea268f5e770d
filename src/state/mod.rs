//! State module for tracking crawl progress
//!
//! Every canonical URL moves through `Discovered -> Queued -> Visited` and ends in
//! either `Succeeded` or `Failed`. Both terminal states are final for the run.

mod page_state;

pub use page_state::PageState;
