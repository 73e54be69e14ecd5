use crate::{UrlError, UrlResult};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// Prefixes that are never crawlable links
const IGNORED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// A URL in canonical form, used as the dedup and lookup key of a crawl
///
/// # Equality Rules
///
/// - The fragment is always stripped
/// - The host is lowercased (by the `url` parser)
/// - The query is preserved as-is; links differing only by query are distinct pages
/// - A trailing `/` on a non-root path is removed, so `/a/` and `/a` are the same page
/// - An empty query (`?` with nothing after it) is dropped
///
/// The trimming only applies to the key. [`NormalizedUrl::resolved`] keeps
/// the URL as it was linked (fragment stripped, trailing slash kept), which
/// is what gets fetched and what relative links resolve against.
#[derive(Debug, Clone)]
pub struct NormalizedUrl {
    key: Url,
    resolved: Url,
}

impl NormalizedUrl {
    /// Parses an absolute HTTP(S) URL and normalizes it
    ///
    /// # Examples
    ///
    /// ```
    /// use linkscope::url::NormalizedUrl;
    ///
    /// let url = NormalizedUrl::parse("https://EXAMPLE.com/docs/#intro").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/docs");
    /// ```
    pub fn parse(input: &str) -> UrlResult<Self> {
        let url = Url::parse(input).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;
        Self::from_url(url)
    }

    /// Normalizes an already parsed URL
    pub fn from_url(mut url: Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        url.set_fragment(None);
        let resolved = url.clone();

        if url.query() == Some("") {
            url.set_query(None);
        }

        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
            url.set_path(&trimmed);
        }

        Ok(Self { key: url, resolved })
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the key as a parsed URL
    pub fn as_url(&self) -> &Url {
        &self.key
    }

    /// Returns the URL to request, with its trailing slash intact
    pub fn resolved(&self) -> &Url {
        &self.resolved
    }

    /// Returns the key's path component (always starts with `/`)
    pub fn path(&self) -> &str {
        self.key.path()
    }
}

impl PartialEq for NormalizedUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NormalizedUrl {}

impl Hash for NormalizedUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for NormalizedUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NormalizedUrl {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Resolves a raw href found on a page into a normalized URL
///
/// `base` is the URL the page was actually served from, so relative links
/// resolve the way a browser would resolve them.
///
/// Returns `None` when the link is not something a crawler can follow:
/// - empty hrefs
/// - fragment-only links (`#section`)
/// - `mailto:`, `tel:`, `javascript:` and `data:` schemes
/// - hrefs that fail to resolve, or resolve to a non-HTTP(S) URL
///
/// # Examples
///
/// ```
/// use linkscope::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/").unwrap();
/// let link = normalize("post-1/#comments", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/blog/post-1");
///
/// assert!(normalize("mailto:team@example.com", &base).is_none());
/// ```
pub fn normalize(raw: &str, base: &Url) -> Option<NormalizedUrl> {
    let href = raw.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let resolved = base.join(href).ok()?;
    NormalizedUrl::from_url(resolved).ok()
}

/// Parses the crawl seed, prefixing `https://` onto a bare host
///
/// # Examples
///
/// ```
/// use linkscope::url::parse_seed;
///
/// let seed = parse_seed("example.com").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
/// ```
pub fn parse_seed(input: &str) -> UrlResult<NormalizedUrl> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("seed URL is empty".to_string()));
    }

    let lowered = trimmed.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    NormalizedUrl::parse(&candidate)
}
