use crate::url::NormalizedUrl;
use std::collections::HashSet;
use url::Origin;

/// Extensions that identify static assets rather than crawlable pages
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "avif", "css", "js", "pdf", "zip",
];

/// Set of path extensions excluded from crawling
///
/// This is a heuristic on the URL path, not a content-type check: a page
/// served from `/index.php` is in scope, `/logo.PNG` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDenylist {
    extensions: HashSet<String>,
}

impl AssetDenylist {
    /// Builds a denylist from extension names (case-insensitive, leading `.` optional)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        Self { extensions }
    }

    /// Returns true if the URL's last path segment carries a denied extension
    pub fn is_asset(&self, url: &NormalizedUrl) -> bool {
        let last_segment = url
            .as_url()
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");

        match last_segment.rsplit_once('.') {
            Some((_, ext)) => self.extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Returns the number of denied extensions
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns true if nothing is denied
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for AssetDenylist {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_EXTENSIONS)
    }
}

/// Returns true if the URL is eligible for crawling
///
/// A URL is in scope iff its origin (scheme, host, port) equals the crawl's
/// origin and its path extension is not on the asset denylist.
pub fn is_in_scope(url: &NormalizedUrl, origin: &Origin, denylist: &AssetDenylist) -> bool {
    url.as_url().origin() == *origin && !denylist.is_asset(url)
}
