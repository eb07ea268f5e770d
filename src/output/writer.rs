//! Output writer for per-page files, the corpus file and the failure report
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/<domain>/<url-path>.md     one file per crawled page (raw Markdown)
//! <root>/<domain>/llms-full.txt     every page, cleaned, in dispatch order
//! <root>/<domain>/failed-urls.json  only written when something failed
//! ```

use crate::output::cleaner::clean_content;
use crate::output::report::{FailureRecord, FailureReport};
use crate::output::PageResult;
use crate::{SiteCorpusError, UrlError};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// File name of the aggregate corpus
pub const CORPUS_FILE_NAME: &str = "llms-full.txt";

/// File name of the failure report
pub const FAILURE_REPORT_FILE_NAME: &str = "failed-urls.json";

/// Paths written when the crawl output is finalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedOutput {
    pub corpus_path: PathBuf,
    pub failure_report_path: Option<PathBuf>,
}

/// Writes the output tree for one domain
#[derive(Debug)]
pub struct OutputWriter {
    domain_dir: PathBuf,
    corpus_blocks: Vec<String>,
}

impl OutputWriter {
    /// Creates a writer rooted at `<root>/<domain>`
    pub fn new(root: &Path, domain: &str) -> Self {
        Self {
            domain_dir: root.join(domain),
            corpus_blocks: Vec::new(),
        }
    }

    /// Writes the raw (uncleaned) Markdown of a page to its mirrored path
    ///
    /// # Returns
    ///
    /// The path that was written
    pub fn write_page(&self, page: &PageResult) -> Result<PathBuf, SiteCorpusError> {
        let url = Url::parse(&page.url)
            .map_err(|e| UrlError::Parse(format!("{}: {}", page.url, e)))?;
        let path = self.domain_dir.join(page_relative_path(&url));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SiteCorpusError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&path, page.content.as_bytes()).map_err(|source| SiteCorpusError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Appends a page's cleaned block to the corpus
    ///
    /// Must be called in dispatch order; the corpus keeps the order of calls.
    pub fn add_to_corpus(&mut self, page: &PageResult) {
        self.corpus_blocks
            .push(format_section(&page.title, &page.content));
    }

    /// Writes the corpus file and, when there are failures, the failure report
    ///
    /// The corpus file is always written, even when it ends up empty. Errors here
    /// are fatal for the run.
    pub fn finish(&self, failures: &[FailureRecord]) -> Result<FinishedOutput, SiteCorpusError> {
        fs::create_dir_all(&self.domain_dir).map_err(|source| SiteCorpusError::Write {
            path: self.domain_dir.clone(),
            source,
        })?;

        let corpus_path = self.domain_dir.join(CORPUS_FILE_NAME);
        let corpus = self.corpus_blocks.join("\n\n");
        write_file(&corpus_path, corpus.trim())?;

        let failure_report_path = if failures.is_empty() {
            None
        } else {
            let path = self.domain_dir.join(FAILURE_REPORT_FILE_NAME);
            let json = FailureReport::new(failures).to_json()?;
            write_file(&path, &json)?;
            Some(path)
        };

        Ok(FinishedOutput {
            corpus_path,
            failure_report_path,
        })
    }
}

/// Formats one corpus section: `# <title>` followed by the cleaned body
pub(crate) fn format_section(title: &str, content: &str) -> String {
    let body = clean_content(content);
    if body.is_empty() {
        format!("# {}", title)
    } else {
        format!("# {}\n\n{}", title, body)
    }
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), SiteCorpusError> {
    fs::write(path, contents).map_err(|source| SiteCorpusError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Maps a page URL to its file path relative to the domain directory
///
/// - `/` becomes `index.md`
/// - `/docs/api` becomes `docs/api.md`
/// - `/docs/` becomes `docs/index.md`
/// - a path already ending in `.md` keeps its name
///
/// Query strings are ignored; dot segments never escape the domain directory.
pub fn page_relative_path(url: &Url) -> PathBuf {
    let path = url.path().trim_start_matches('/');

    let mut relative = if path.is_empty() {
        "index".to_string()
    } else if path.ends_with('/') {
        format!("{}index", path)
    } else {
        path.to_string()
    };

    if !relative.ends_with(".md") {
        relative.push_str(".md");
    }

    relative
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect()
}
