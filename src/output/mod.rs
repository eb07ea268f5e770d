//! Output module for page files, the corpus and the failure report
//!
//! This module handles:
//! - Cleaning converted Markdown before it enters the corpus
//! - Mirroring each crawled page to `<root>/<domain>/<url-path>.md`
//! - Writing the aggregate `llms-full.txt` corpus and `failed-urls.json`
//! - Rebuilding the corpus from an existing output directory

mod cleaner;
mod corpus;
mod report;
mod writer;

pub use cleaner::clean_content;
pub use corpus::{build_corpus, rebuild_corpus, section_title};
pub use report::{FailureRecord, FailureReport};
pub use writer::{
    page_relative_path, FinishedOutput, OutputWriter, CORPUS_FILE_NAME, FAILURE_REPORT_FILE_NAME,
};

/// A successfully fetched and converted page
///
/// Produced once per successful fetch and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Canonical URL of the page
    pub url: String,

    /// Document title, or the URL when the page has none
    pub title: String,

    /// Raw Markdown converted from the page body (before cleaning)
    pub content: String,
}
