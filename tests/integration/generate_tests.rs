//! Integration tests for rebuilding the corpus from an output directory

use sitecorpus::output::rebuild_corpus;
use sitecorpus::SiteCorpusError;
use std::fs;
use tempfile::TempDir;

const DOMAIN: &str = "docs.example.com";

#[test]
fn test_generate_from_nested_files() {
    let root = TempDir::new().unwrap();
    let domain_dir = root.path().join(DOMAIN);
    fs::create_dir_all(domain_dir.join("b")).unwrap();
    fs::write(domain_dir.join("a.md"), "Alpha").unwrap();
    fs::write(domain_dir.join("b").join("c.md"), "  Gamma\n\n\n").unwrap();

    let corpus_path = rebuild_corpus(root.path(), DOMAIN).unwrap();

    assert_eq!(corpus_path, domain_dir.join("llms-full.txt"));
    assert_eq!(
        fs::read_to_string(&corpus_path).unwrap(),
        "# a\n\nAlpha\n\n# b - c\n\nGamma"
    );
}

#[test]
fn test_generate_ignores_previous_outputs() {
    let root = TempDir::new().unwrap();
    let domain_dir = root.path().join(DOMAIN);
    fs::create_dir_all(&domain_dir).unwrap();
    fs::write(domain_dir.join("index.md"), "Home").unwrap();
    fs::write(domain_dir.join("llms-full.txt"), "# stale\n\nold corpus").unwrap();
    fs::write(domain_dir.join("failed-urls.json"), "{}").unwrap();

    let corpus_path = rebuild_corpus(root.path(), DOMAIN).unwrap();
    let corpus = fs::read_to_string(corpus_path).unwrap();

    assert_eq!(corpus, "# index\n\nHome");

    // Running twice gives the same file
    let again = rebuild_corpus(root.path(), DOMAIN).unwrap();
    assert_eq!(fs::read_to_string(again).unwrap(), corpus);
}

#[test]
fn test_generate_missing_domain_directory() {
    let root = TempDir::new().unwrap();

    let result = rebuild_corpus(root.path(), DOMAIN);
    assert!(matches!(result, Err(SiteCorpusError::InvalidDomain(_))));
}

#[test]
fn test_generate_rejects_path_like_domain() {
    let root = TempDir::new().unwrap();

    let result = rebuild_corpus(root.path(), "../outside");
    assert!(matches!(result, Err(SiteCorpusError::InvalidDomain(_))));
}
