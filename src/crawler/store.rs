//! Crawl result store and failed-URL set
//!
//! Both containers are written at most once per key, by the worker that
//! owns that URL's task, and drained once after the pool has finished.

use crate::analysis::PageMetrics;
use crate::crawler::graph::LinkGraphMetrics;
use crate::url::NormalizedUrl;
use crate::FetchError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A successfully crawled page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Store key for this page
    pub url: NormalizedUrl,

    /// Depth of the task that fetched this page
    pub depth: u32,

    /// Analyzer output, never modified by the crawler
    pub metrics: PageMetrics,

    /// Normalized links found on the page, deduplicated in document order
    pub outgoing_links: Vec<NormalizedUrl>,

    /// Graph-derived values, filled in once after the crawl
    pub link_graph: LinkGraphMetrics,
}

impl PageRecord {
    pub fn new(
        url: NormalizedUrl,
        depth: u32,
        metrics: PageMetrics,
        outgoing_links: Vec<NormalizedUrl>,
    ) -> Self {
        Self {
            url,
            depth,
            metrics,
            outgoing_links,
            link_graph: LinkGraphMetrics::default(),
        }
    }
}

/// A URL whose fetch failed, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: NormalizedUrl,
    pub reason: FetchError,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Map from normalized URL to its page record
#[derive(Debug, Default)]
pub struct ResultStore {
    pages: Mutex<HashMap<NormalizedUrl, PageRecord>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record under its URL
    ///
    /// A second record for the same URL is a crawler bug; the first one wins.
    pub fn insert(&self, record: PageRecord) {
        let mut pages = lock(&self.pages);
        if pages.contains_key(&record.url) {
            tracing::error!("Duplicate page record for {}", record.url);
            return;
        }
        pages.insert(record.url.clone(), record);
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        lock(&self.pages).contains_key(url)
    }

    pub fn len(&self) -> usize {
        lock(&self.pages).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains every record out of the store
    pub fn take(&self) -> HashMap<NormalizedUrl, PageRecord> {
        std::mem::take(&mut *lock(&self.pages))
    }
}

/// Set of URLs whose fetch failed
#[derive(Debug, Default)]
pub struct FailedSet {
    failed: Mutex<HashMap<NormalizedUrl, FetchError>>,
}

impl FailedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: NormalizedUrl, reason: FetchError) {
        lock(&self.failed).entry(url).or_insert(reason);
    }

    pub fn contains(&self, url: &NormalizedUrl) -> bool {
        lock(&self.failed).contains_key(url)
    }

    pub fn len(&self) -> usize {
        lock(&self.failed).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn take(&self) -> HashMap<NormalizedUrl, FetchError> {
        std::mem::take(&mut *lock(&self.failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> NormalizedUrl {
        NormalizedUrl::parse(s).unwrap()
    }

    fn record(s: &str) -> PageRecord {
        PageRecord::new(url(s), 0, PageMetrics::default(), Vec::new())
    }

    #[test]
    fn test_insert_and_take() {
        let store = ResultStore::new();
        store.insert(record("https://example.com/"));
        store.insert(record("https://example.com/a"));

        assert_eq!(store.len(), 2);
        assert!(store.contains(&url("https://example.com/a/")));

        let pages = store.take();
        assert_eq!(pages.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_record_wins() {
        let store = ResultStore::new();
        let mut first = record("https://example.com/");
        first.depth = 0;
        let mut second = record("https://example.com/");
        second.depth = 3;

        store.insert(first);
        store.insert(second);

        let pages = store.take();
        assert_eq!(pages[&url("https://example.com/")].depth, 0);
    }

    #[test]
    fn test_failed_set() {
        let failed = FailedSet::new();
        failed.insert(url("https://example.com/b"), FetchError::Status { status: 404 });

        assert!(failed.contains(&url("https://example.com/b")));
        assert!(!failed.contains(&url("https://example.com/a")));

        let drained = failed.take();
        assert_eq!(
            drained[&url("https://example.com/b")],
            FetchError::Status { status: 404 }
        );
        assert!(failed.is_empty());
    }
}
