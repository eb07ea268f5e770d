//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end into a temporary output directory.

use sitecorpus::config::Config;
use sitecorpus::crawler::{crawl, CrawlReport, SEED_REFERRER};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `root`
fn create_test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrent_requests = 5;
    config.crawler.request_timeout_secs = Some(5);
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.user_agent.contact_url = Some("https://example.com/bot".to_string());
    config.output.root_dir = root.to_string_lossy().into_owned();
    config
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

/// Mounts a small site: `/` -> `/a`, `/b`; `/a` -> `/`, `/b`, `/missing` (404)
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home Page",
            r##"<nav>Nav junk</nav>
               <script>var tracking = 1;</script>
               <p>Welcome home</p>
               <a href="/a">Alpha</a>
               <a href="/b#section">Beta</a>
               <a href="https://other.test/x">Elsewhere</a>
               <a href="mailto:team@example.com">Mail</a>
               <a href="#top">Top</a>"##,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(
            "Alpha Page",
            r#"<p>Alpha content</p>
               <a href="/">Home</a>
               <a href="/b">Beta</a>
               <a href="/missing">Missing</a>"#,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("Beta Page", "<p>Beta content</p>"))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;
}

async fn crawl_site(server: &MockServer, root: &Path) -> CrawlReport {
    crawl(create_test_config(root), &server.uri())
        .await
        .expect("crawl should finish")
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;

    assert_eq!(report.pages_succeeded, 3);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.waves, 3);

    let domain_dir = output.path().join(&report.domain);
    assert!(domain_dir.join("index.md").exists());
    assert!(domain_dir.join("a.md").exists());
    assert!(domain_dir.join("b.md").exists());
    assert!(!domain_dir.join("missing.md").exists());
    assert_eq!(report.corpus_path, domain_dir.join("llms-full.txt"));
}

#[tokio::test]
async fn test_corpus_follows_dispatch_order_and_drops_noise() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;
    let corpus = fs::read_to_string(&report.corpus_path).unwrap();

    assert!(corpus.starts_with("# Home Page"));
    let home = corpus.find("# Home Page").unwrap();
    let alpha = corpus.find("# Alpha Page").unwrap();
    let beta = corpus.find("# Beta Page").unwrap();
    assert!(home < alpha && alpha < beta);

    assert!(corpus.contains("Welcome home"));
    assert!(corpus.contains("Alpha content"));
    assert!(!corpus.contains("Nav junk"));
    assert!(!corpus.contains("tracking"));
}

#[tokio::test]
async fn test_slow_page_keeps_its_place_in_corpus() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home Page",
            r#"<a href="/a">A</a><a href="/b">B</a>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            html_page("Slow Page", "<p>Took a while</p>").set_delay(Duration::from_millis(400)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("Fast Page", "<p>Right away</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;
    let corpus = fs::read_to_string(&report.corpus_path).unwrap();

    let home = corpus.find("# Home Page").unwrap();
    let slow = corpus.find("# Slow Page").unwrap();
    let fast = corpus.find("# Fast Page").unwrap();
    assert!(home < slow);
    assert!(slow < fast, "corpus must follow dispatch order: {}", corpus);
}

#[tokio::test]
async fn test_failed_child_reported_with_referrer() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();
    let base = mock_server.uri();

    let report = crawl_site(&mock_server, output.path()).await;

    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.url, format!("{}/missing", base));
    assert_eq!(failure.referrer, format!("{}/a", base));
    assert!(failure.reason.contains("404"));

    let report_path = report.failure_report_path.expect("failure report written");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(json["totalFailed"], 1);
    assert!(json["timestamp"].as_str().is_some());
    assert_eq!(json["failedPages"][0]["url"], format!("{}/missing", base));
    assert_eq!(json["failedPages"][0]["referrer"], format!("{}/a", base));
}

#[tokio::test]
async fn test_clean_crawl_writes_no_failure_report() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Only Page", "<p>Nothing else</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;

    assert_eq!(report.pages_succeeded, 1);
    assert!(report.failures.is_empty());
    assert!(report.failure_report_path.is_none());
    assert!(!output
        .path()
        .join(&report.domain)
        .join("failed-urls.json")
        .exists());
}

#[tokio::test]
async fn test_unreachable_seed_records_initial_url_referrer() {
    let output = TempDir::new().unwrap();
    // Nothing listens on port 1
    let seed = "http://127.0.0.1:1/";

    let report = crawl(create_test_config(output.path()), seed)
        .await
        .expect("fetch failures are not fatal");

    assert_eq!(report.pages_succeeded, 0);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, seed);
    assert_eq!(report.failures[0].referrer, SEED_REFERRER);

    let corpus = fs::read_to_string(&report.corpus_path).unwrap();
    assert!(corpus.is_empty());
    assert!(report.failure_report_path.is_some());
}

#[tokio::test]
async fn test_invalid_seed_is_an_error() {
    let output = TempDir::new().unwrap();
    let result = crawl(create_test_config(output.path()), "ftp://example.com/").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0 (+https://example.com/bot)"))
        .respond_with(html_page("Home", "<p>hi</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;
    assert_eq!(report.pages_succeeded, 1);
}

#[tokio::test]
async fn test_redirect_followed_and_stored_under_requested_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/old">Old</a>"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page("New Home", "<p>Moved here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let output = TempDir::new().unwrap();

    let report = crawl_site(&mock_server, output.path()).await;

    assert_eq!(report.pages_succeeded, 2);
    let page = fs::read_to_string(output.path().join(&report.domain).join("old.md")).unwrap();
    assert!(page.contains("Moved here"));
}
