use crate::UrlError;
use url::Url;

/// Crawl-wide context that every discovered href is resolved against
///
/// Built once from the seed URL. Besides the origin and base path it carries the
/// *context path*: the base path's first segment, extended through the first
/// version-like segment when the base path has one (`/docs/v2/intro` gives
/// `/docs/v2`). Links into the same section without a version of their own are
/// pinned to that context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlContext {
    base: Url,
    context_segments: Vec<String>,
}

impl CrawlContext {
    /// Creates the context for a crawl seeded at `seed`
    pub fn from_seed(seed: &Url) -> Self {
        let mut base = seed.clone();
        base.set_fragment(None);

        let segments: Vec<String> = base
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let context_segments = match segments.first() {
            None => Vec::new(),
            Some(_) => match find_version_segment(&segments) {
                Some(index) => segments[..=index].to_vec(),
                None => segments[..1].to_vec(),
            },
        };

        Self {
            base,
            context_segments,
        }
    }

    /// The seed URL without its fragment
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn scheme(&self) -> &str {
        self.base.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.base.host_str()
    }

    /// The context path, e.g. `/docs/v2`, or `/` when the seed is the site root
    pub fn context_path(&self) -> String {
        format!("/{}", self.context_segments.join("/"))
    }

    /// Host-only comparison; scheme and port do not matter
    fn is_same_host(&self, url: &Url) -> bool {
        match (url.host_str(), self.base.host_str()) {
            (Some(candidate), Some(base)) => candidate.eq_ignore_ascii_case(base),
            _ => false,
        }
    }
}

/// Parses and canonicalizes the crawl seed
///
/// Unlike [`normalize_href`] this is strict: a seed that is not an absolute
/// http(s) URL with a host is rejected.
pub fn parse_seed_url(seed: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Normalizes a raw href into a canonical absolute URL string
///
/// # Normalization Steps
///
/// 1. Strip the fragment (`#...`)
/// 2. Protocol-relative hrefs (`//host/...`) inherit the base scheme
/// 3. Root-relative hrefs (`/...`) are joined to the base origin
/// 4. Other relative hrefs are resolved against the base URL
/// 5. Any result on the base host whose first path segment matches the context
///    path's first segment is pinned to the context path, unless one of its later
///    segments is version-like (`v1`, `2024`), in which case it is kept as a
///    sibling version
///
/// Never fails: when the href cannot be parsed, the original string is returned
/// unchanged and will normally be dropped by the scope check.
///
/// # Examples
///
/// ```
/// use sitecorpus::url::{normalize_href, CrawlContext};
/// use url::Url;
///
/// let seed = Url::parse("https://docs.example.com/docs/v2/intro").unwrap();
/// let context = CrawlContext::from_seed(&seed);
///
/// assert_eq!(
///     normalize_href("/docs/guide#setup", &context),
///     "https://docs.example.com/docs/v2/guide"
/// );
/// assert_eq!(
///     normalize_href("/docs/v3/guide", &context),
///     "https://docs.example.com/docs/v3/guide"
/// );
/// ```
pub fn normalize_href(href: &str, context: &CrawlContext) -> String {
    let target = strip_fragment(href.trim());

    let resolved = if target.starts_with("//") {
        Url::parse(&format!("{}:{}", context.scheme(), target))
    } else if target.starts_with('/') {
        context.base.join(target)
    } else {
        match Url::parse(target) {
            Err(url::ParseError::RelativeUrlWithoutBase) => context.base.join(target),
            other => other,
        }
    };

    match resolved {
        Ok(mut url) => {
            url.set_fragment(None);
            if context.is_same_host(&url) {
                pin_to_context(&mut url, context);
            }
            url.to_string()
        }
        Err(e) => {
            tracing::trace!("Keeping unparsable href {:?} as-is: {}", href, e);
            href.to_string()
        }
    }
}

fn strip_fragment(href: &str) -> &str {
    match href.find('#') {
        Some(index) => &href[..index],
        None => href,
    }
}

/// Rewrites the path of a same-host URL onto the context path
fn pin_to_context(url: &mut Url, context: &CrawlContext) {
    // A single-segment context maps the first segment onto itself
    if context.context_segments.len() < 2 {
        return;
    }

    let segments: Vec<String> = match url.path_segments() {
        Some(segments) => segments.map(str::to_string).collect(),
        None => return,
    };

    if segments.first() != context.context_segments.first() {
        return;
    }

    if find_version_segment(&segments).is_some() {
        return;
    }

    let mut path = context.context_path();
    if segments.len() > 1 {
        path.push('/');
        path.push_str(&segments[1..].join("/"));
    }
    url.set_path(&path);
}

/// Index of the first version-like segment after the first one; first match wins
fn find_version_segment<S: AsRef<str>>(segments: &[S]) -> Option<usize> {
    segments
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, segment)| is_version_like(segment.as_ref()))
        .map(|(index, _)| index)
}

/// `v` followed by a digit, or a segment starting with four digits
fn is_version_like(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let v_digit = bytes.len() >= 2 && bytes[0] == b'v' && bytes[1].is_ascii_digit();
    let year = bytes.len() >= 4 && bytes[..4].iter().all(u8::is_ascii_digit);
    v_digit || year
}
