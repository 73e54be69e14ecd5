//! Crawler module for page discovery and link-graph analysis
//!
//! This module contains the core crawling logic, including:
//! - The frontier with its at-most-once enqueue guarantee
//! - The worker pool that fetches, analyzes and discovers links
//! - The result store and failed-URL set
//! - The post-crawl link-graph pass
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod graph;
mod pool;
mod state;
mod store;

pub use crate::config::CrawlConfig;
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchRoute, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{CrawlProgress, CrawlTask, Frontier};
pub use graph::{analyze_link_graph, LinkGraphMetrics, LinkGraphSummary};
pub use state::CrawlState;
pub use store::{FailedSet, FailedUrl, PageRecord, ResultStore};

use crate::url::NormalizedUrl;
use chrono::{DateTime, Utc};

/// How a crawl ended, from the caller's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// The frontier drained and at least one page was fetched
    Complete,
    /// The crawl was cancelled before the frontier drained
    Incomplete,
    /// The frontier drained without a single successful fetch
    NothingReachable,
}

impl CrawlStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::NothingReachable => "nothing reachable",
        }
    }
}

/// Result of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub seed: NormalizedUrl,

    /// Annotated pages ordered by (depth, url)
    pub pages: Vec<PageRecord>,

    /// Failed URLs ordered by url
    pub failed_urls: Vec<FailedUrl>,

    pub orphan_count: usize,

    /// Broken-link references summed over all pages
    pub broken_link_count: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// False when the crawl was cancelled before the frontier drained
    pub complete: bool,
}

impl CrawlOutcome {
    pub fn status(&self) -> CrawlStatus {
        if !self.complete {
            CrawlStatus::Incomplete
        } else if self.pages.is_empty() {
            CrawlStatus::NothingReachable
        } else {
            CrawlStatus::Complete
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn page(&self, url: &NormalizedUrl) -> Option<&PageRecord> {
        self.pages.iter().find(|page| &page.url == url)
    }

    pub fn is_failed(&self, url: &NormalizedUrl) -> bool {
        self.failed_urls.iter().any(|failed| &failed.url == url)
    }

    pub fn orphans(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(|page| page.link_graph.is_orphan)
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier
/// 3. Fetch pages and follow in-scope links up to the depth bound
/// 4. Annotate every page with link-graph metrics
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran; individual fetch failures are inside
/// * `Err(LinkscopeError)` - The HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use linkscope::{crawl, CrawlConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("example.com")?;
/// let outcome = crawl(config).await?;
/// println!("{} pages, {} orphans", outcome.pages.len(), outcome.orphan_count);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> crate::Result<CrawlOutcome> {
    Ok(Coordinator::new(config)?.run().await)
}
