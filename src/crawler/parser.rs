//! HTML parser for extracting page title, links and Markdown content
//!
//! Noise elements (`script`, `style`, `nav`, `footer`, `header`, `iframe`) are
//! detached from the DOM before anything is extracted, so navigation chrome
//! neither leaks into the Markdown nor contributes links.

use crate::url::{is_in_scope, is_navigable_href, normalize_href, CrawlContext};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Elements stripped from every page before extraction
const NOISE_SELECTOR: &str = "script, style, nav, footer, header, iframe";

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The `<title>` text, or the page URL when the page has none
    pub title: String,

    /// In-scope canonical links, de-duplicated, in document order
    pub links: Vec<String>,

    /// Body markup converted to Markdown
    pub markdown: String,
}

/// Parses HTML content and extracts title, links and Markdown
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` outside noise elements whose canonical form is on
/// the crawl host or one of its subdomains.
///
/// **Exclude:** empty and fragment-only hrefs, `mailto:`, `tel:`, `javascript:`
/// and `data:` links, and anything off-domain after normalization.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The canonical URL of the page (title fallback)
/// * `context` - The crawl context hrefs are normalized against
///
/// # Example
///
/// ```
/// use sitecorpus::crawler::parse_html;
/// use sitecorpus::url::CrawlContext;
/// use url::Url;
///
/// let context = CrawlContext::from_seed(&Url::parse("https://example.com/").unwrap());
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html, "https://example.com/", &context).unwrap();
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, page_url: &str, context: &CrawlContext) -> Result<ParsedPage, String> {
    let mut document = Html::parse_document(html);

    remove_noise(&mut document)?;

    let title = extract_title(&document)?.unwrap_or_else(|| page_url.to_string());
    let links = extract_links(&document, context)?;
    let markdown = html2md::parse_html(&extract_body_html(&document)?);

    Ok(ParsedPage {
        title,
        links,
        markdown,
    })
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("Invalid selector '{}': {:?}", css, e))
}

/// Detaches every noise element from the document tree
fn remove_noise(document: &mut Html) -> Result<(), String> {
    let noise = selector(NOISE_SELECTOR)?;
    let ids: Vec<_> = document.select(&noise).map(|element| element.id()).collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    Ok(())
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Result<Option<String>, String> {
    let title_selector = selector("title")?;

    Ok(document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Extracts all in-scope links from the HTML document
fn extract_links(document: &Html, context: &CrawlContext) -> Result<Vec<String>, String> {
    let a_selector = selector("a[href]")?;
    let base_host = context.host().unwrap_or_default();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !is_navigable_href(href) {
            continue;
        }

        let canonical = normalize_href(href, context);
        if !is_in_scope(&canonical, base_host) {
            tracing::trace!("Dropping out-of-scope link {}", canonical);
            continue;
        }

        if seen.insert(canonical.clone()) {
            links.push(canonical);
        }
    }

    Ok(links)
}

/// Returns the `<body>` inner markup, or the whole document if there is no body
fn extract_body_html(document: &Html) -> Result<String, String> {
    let body_selector = selector("body")?;

    Ok(document
        .select(&body_selector)
        .next()
        .map(|body| body.inner_html())
        .unwrap_or_else(|| document.root_element().html()))
}
