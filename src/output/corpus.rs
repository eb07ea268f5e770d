//! Rebuilds the corpus file from an existing output directory
//!
//! Used by the `generate` command: no network access, just the `.md` files a
//! previous crawl left under `<root>/<domain>/`.

use crate::output::writer::{format_section, write_file, CORPUS_FILE_NAME};
use crate::SiteCorpusError;
use std::fs;
use std::path::{Path, PathBuf};

/// Rebuilds `<root>/<domain>/llms-full.txt` from the page files under it
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the rewritten corpus file
/// * `Err(SiteCorpusError)` - Invalid domain, missing directory, or I/O failure
pub fn rebuild_corpus(root: &Path, domain: &str) -> Result<PathBuf, SiteCorpusError> {
    validate_domain_arg(domain)?;

    let domain_dir = root.join(domain);
    if !domain_dir.is_dir() {
        return Err(SiteCorpusError::InvalidDomain(format!(
            "no output directory at {}",
            domain_dir.display()
        )));
    }

    let corpus = build_corpus(&domain_dir)?;
    let corpus_path = domain_dir.join(CORPUS_FILE_NAME);
    write_file(&corpus_path, &corpus)?;

    tracing::info!("Rebuilt corpus at {}", corpus_path.display());
    Ok(corpus_path)
}

/// Builds corpus text from every `.md` file below `domain_dir`
///
/// Files are sorted by their relative path so the result does not depend on
/// directory enumeration order. Each section is `# <title>` followed by the
/// cleaned file content; sections are separated by one blank line.
pub fn build_corpus(domain_dir: &Path) -> Result<String, SiteCorpusError> {
    let mut files = Vec::new();
    collect_markdown_files(domain_dir, &mut files)?;

    let mut entries: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(domain_dir).ok()?.to_path_buf();
            Some((section_title(&relative), path))
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    tracing::debug!(
        "Found {} markdown files under {}",
        entries.len(),
        domain_dir.display()
    );

    let mut sections = Vec::with_capacity(entries.len());
    for (title, path) in entries {
        let content = fs::read_to_string(&path).map_err(|source| SiteCorpusError::Read {
            path: path.clone(),
            source,
        })?;
        sections.push(format_section(&title, &content));
    }

    Ok(sections.join("\n\n"))
}

/// Derives a section title from a path relative to the domain directory
///
/// `b/c.md` becomes `b - c`.
pub fn section_title(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" - ");

    match joined.strip_suffix(".md") {
        Some(stripped) => stripped.to_string(),
        None => joined,
    }
}

/// Recursively collects `.md` files; symlinked directories are not followed
fn collect_markdown_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SiteCorpusError> {
    let read_error = |source: std::io::Error| SiteCorpusError::Read {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;
        let path = entry.path();

        if file_type.is_dir() {
            collect_markdown_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }

    Ok(())
}

/// The domain names a directory directly under the output root
fn validate_domain_arg(domain: &str) -> Result<(), SiteCorpusError> {
    if domain.trim().is_empty()
        || domain.contains('/')
        || domain.contains('\\')
        || domain.contains("..")
    {
        return Err(SiteCorpusError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}
