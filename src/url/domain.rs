use url::Url;

/// Href schemes that never lead to a crawlable page
const NON_NAVIGABLE_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitecorpus::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `candidate_host` is `base_host` or one of its subdomains
///
/// Both hosts are split on `.` and compared label by label from the right. The
/// candidate must have at least as many labels as the base, and the base's labels
/// must be a suffix of the candidate's.
pub fn hosts_in_scope(candidate_host: &str, base_host: &str) -> bool {
    let candidate = candidate_host.to_lowercase();
    let base = base_host.to_lowercase();

    let candidate_labels: Vec<&str> = candidate.split('.').collect();
    let base_labels: Vec<&str> = base.split('.').collect();

    if candidate_labels.len() < base_labels.len() {
        return false;
    }

    candidate_labels
        .iter()
        .rev()
        .zip(base_labels.iter().rev())
        .all(|(c, b)| c == b)
}

/// Returns true if a canonical URL belongs to the crawl's domain
///
/// Anything that does not parse as a URL with a host is out of scope.
///
/// # Examples
///
/// ```
/// use sitecorpus::url::is_in_scope;
///
/// assert!(is_in_scope("https://example.com/a", "example.com"));
/// assert!(is_in_scope("https://docs.example.com/a", "example.com"));
/// assert!(!is_in_scope("https://example.org/a", "example.com"));
/// ```
pub fn is_in_scope(canonical_url: &str, base_host: &str) -> bool {
    match Url::parse(canonical_url) {
        Ok(url) => match url.host_str() {
            Some(host) => hosts_in_scope(host, base_host),
            None => false,
        },
        Err(_) => false,
    }
}

/// Returns false for hrefs that can never name a page: empty, fragment-only,
/// or using a `mailto:`, `tel:`, `javascript:` or `data:` scheme
pub fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !NON_NAVIGABLE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
