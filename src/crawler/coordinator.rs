//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties one crawl run together:
//! - Creating a fresh [`CrawlState`] for the run
//! - Seeding the frontier with the seed and any known URLs
//! - Running the worker pool until it drains or is cancelled
//! - Running the link-graph pass and assembling the outcome

use crate::analysis::{HtmlAnalyzer, PageAnalyzer};
use crate::config::CrawlConfig;
use crate::crawler::fetcher::{build_http_client, Fetcher, HttpFetcher};
use crate::crawler::graph::analyze_link_graph;
use crate::crawler::pool::{run_pool, WorkerContext};
use crate::crawler::state::CrawlState;
use crate::crawler::store::FailedUrl;
use crate::crawler::CrawlOutcome;
use crate::url::is_in_scope;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Main crawler coordinator structure
///
/// Generic over its collaborators so tests can substitute an in-memory
/// fetcher or analyzer.
pub struct Coordinator<F = HttpFetcher, A = HtmlAnalyzer> {
    config: Arc<CrawlConfig>,
    fetcher: Arc<F>,
    analyzer: Arc<A>,
    cancel: CancellationToken,
}

impl Coordinator<HttpFetcher, HtmlAnalyzer> {
    /// Creates a coordinator with the production HTTP fetcher and HTML analyzer
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(LinkscopeError)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, config.request_timeout)?;
        let fetcher = HttpFetcher::new(client, config.route.clone());
        Ok(Self::with_collaborators(config, fetcher, HtmlAnalyzer))
    }
}

impl<F, A> Coordinator<F, A>
where
    F: Fetcher,
    A: PageAnalyzer,
{
    pub fn with_collaborators(config: CrawlConfig, fetcher: F, analyzer: A) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            analyzer: Arc::new(analyzer),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token
    ///
    /// Cancelling stops workers before their next dequeue. The partial
    /// results are still analyzed and returned as an incomplete outcome.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// This method:
    /// 1. Seeds the frontier with the seed and in-scope known URLs
    /// 2. Runs the worker pool until the frontier is done
    /// 3. Annotates every page with link-graph metrics
    /// 4. Returns pages ordered by (depth, url) and failures ordered by url
    pub async fn run(self) -> CrawlOutcome {
        let started_at = Utc::now();
        let config = Arc::clone(&self.config);
        let state = Arc::new(CrawlState::new());
        let origin = config.seed.as_url().origin();

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            config.seed,
            config.max_depth,
            config.concurrency
        );

        state.frontier.seed(config.seed.clone());
        for known in &config.known_urls {
            if !is_in_scope(known, &origin, &config.asset_denylist) {
                tracing::warn!("Skipping out-of-scope known URL {}", known);
                continue;
            }
            state.frontier.seed(known.clone());
        }

        run_pool(WorkerContext {
            config: Arc::clone(&config),
            state: Arc::clone(&state),
            fetcher: self.fetcher,
            analyzer: self.analyzer,
            cancel: self.cancel.clone(),
            origin,
        })
        .await;

        let complete = state.frontier.is_done();
        if !complete {
            tracing::warn!("Crawl cancelled with {} URLs still queued", state.progress().queued);
        }

        let mut pages = state.results.take();
        let failed = state.failed.take();
        let summary = analyze_link_graph(&mut pages, &failed, &config.seed);

        let mut pages: Vec<_> = pages.into_values().collect();
        pages.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.url.cmp(&b.url)));

        let mut failed_urls: Vec<FailedUrl> = failed
            .into_iter()
            .map(|(url, reason)| FailedUrl { url, reason })
            .collect();
        failed_urls.sort_by(|a, b| a.url.cmp(&b.url));

        tracing::info!(
            "Crawl finished: {} pages, {} failed, {} orphans, {} broken links",
            pages.len(),
            failed_urls.len(),
            summary.orphan_count,
            summary.broken_link_count
        );

        CrawlOutcome {
            seed: config.seed.clone(),
            pages,
            failed_urls,
            orphan_count: summary.orphan_count,
            broken_link_count: summary.broken_link_count,
            started_at,
            finished_at: Utc::now(),
            complete,
        }
    }
}
