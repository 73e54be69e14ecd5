//! Worker pool
//!
//! Runs `concurrency` workers against one [`CrawlState`]. Each worker loops:
//! - dequeue a task, or wait briefly if the queue is momentarily empty
//! - fetch and analyze the page
//! - record the page (or the failure) and enqueue new in-scope links
//! - pause for the crawl delay
//!
//! Workers exit once the frontier reports done or the crawl is cancelled.

use crate::analysis::{AnalyzeOptions, PageAnalyzer};
use crate::config::CrawlConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::state::CrawlState;
use crate::crawler::store::PageRecord;
use crate::url::{is_in_scope, normalize, NormalizedUrl};
use crate::FetchError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::{Origin, Url};

/// Wait before re-polling a queue that is empty while tasks are in flight
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Emit a progress line every this many completed tasks
const PROGRESS_INTERVAL: usize = 10;

/// Everything a worker needs, shared across the pool
pub(crate) struct WorkerContext<F, A> {
    pub config: Arc<CrawlConfig>,
    pub state: Arc<CrawlState>,
    pub fetcher: Arc<F>,
    pub analyzer: Arc<A>,
    pub cancel: CancellationToken,
    pub origin: Origin,
}

impl<F, A> Clone for WorkerContext<F, A> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
            fetcher: Arc::clone(&self.fetcher),
            analyzer: Arc::clone(&self.analyzer),
            cancel: self.cancel.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Marks a dequeued task finished when dropped, including on panic
struct InFlight<'a> {
    frontier: &'a Frontier,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(frontier: &'a Frontier) -> Self {
        Self {
            frontier,
            finished: false,
        }
    }

    /// Finishes the task and returns the processed count
    fn finish(mut self) -> usize {
        self.finished = true;
        self.frontier.finish()
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.frontier.finish();
        }
    }
}

/// Runs the pool until every worker has exited
pub(crate) async fn run_pool<F, A>(ctx: WorkerContext<F, A>)
where
    F: Fetcher,
    A: PageAnalyzer,
{
    let workers = ctx.config.concurrency.max(1);
    let mut join_set = JoinSet::new();

    for id in 0..workers {
        join_set.spawn(worker_loop(id, ctx.clone()));
    }

    while let Some(result) = join_set.join_next().await {
        if let Err(e) = result {
            tracing::error!("Worker task failed: {}", e);
        }
    }
}

async fn worker_loop<F, A>(id: usize, ctx: WorkerContext<F, A>)
where
    F: Fetcher,
    A: PageAnalyzer,
{
    tracing::debug!("Worker {} started", id);

    loop {
        if ctx.cancel.is_cancelled() {
            tracing::debug!("Worker {} cancelled", id);
            break;
        }

        let task = match ctx.state.frontier.dequeue() {
            Some(task) => task,
            None => {
                if ctx.state.frontier.is_done() {
                    break;
                }
                // Another worker may still enqueue links
                tokio::select! {
                    _ = ctx.cancel.cancelled() => break,
                    _ = tokio::time::sleep(IDLE_POLL) => {}
                }
                continue;
            }
        };

        let in_flight = InFlight::new(&ctx.state.frontier);
        tracing::debug!("Worker {} processing {} (depth {})", id, task.url, task.depth);
        process_task(&ctx, task).await;
        let processed = in_flight.finish();

        if processed % PROGRESS_INTERVAL == 0 {
            let progress = ctx.state.progress();
            tracing::info!(
                "Progress: {} processed, {} queued, {} in flight, {:.2} pages/sec",
                progress.processed,
                progress.queued,
                progress.in_flight,
                ctx.state.rate()
            );
        }

        if !ctx.config.crawl_delay.is_zero() {
            tokio::select! {
                _ = ctx.cancel.cancelled() => break,
                _ = tokio::time::sleep(ctx.config.crawl_delay) => {}
            }
        }
    }

    tracing::debug!("Worker {} exiting", id);
}

/// Fetches one task and records its outcome
async fn process_task<F, A>(ctx: &WorkerContext<F, A>, task: CrawlTask)
where
    F: Fetcher,
    A: PageAnalyzer,
{
    let fetched = match tokio::time::timeout(
        ctx.config.request_timeout,
        ctx.fetcher.fetch(task.url.resolved()),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };

    let page = match fetched {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", task.url, e);
            ctx.state.failed.insert(task.url, e);
            return;
        }
    };

    let options = AnalyzeOptions {
        elapsed_ms: Some(elapsed_millis(page.elapsed)),
    };
    let metrics = ctx
        .analyzer
        .analyze_page(&page.body, task.url.resolved(), options);
    let raw_links = ctx.analyzer.extract_links(&page.body, &page.final_url);
    let outgoing_links = collect_outgoing_links(&raw_links, &page.final_url);

    if task.depth < ctx.config.max_depth {
        let next_depth = task.depth + 1;
        for link in &outgoing_links {
            if !is_in_scope(link, &ctx.origin, &ctx.config.asset_denylist) {
                continue;
            }
            if ctx.state.frontier.try_enqueue(link.clone(), next_depth) {
                tracing::debug!("Discovered {} (depth {})", link, next_depth);
            }
        }
    }

    ctx.state.results.insert(PageRecord::new(
        task.url,
        task.depth,
        metrics,
        outgoing_links,
    ));
}

/// Whole milliseconds, saturating at `u64::MAX`
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Normalizes raw hrefs, dropping failures and duplicates
fn collect_outgoing_links(raw_links: &[String], base: &Url) -> Vec<NormalizedUrl> {
    let mut seen = HashSet::new();
    raw_links
        .iter()
        .filter_map(|raw| normalize(raw, base))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_outgoing_links() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        let raw: Vec<String> = [
            "intro",
            "intro/",
            "#top",
            "",
            "mailto:a@example.com",
            "/about",
            "https://other.test/x",
            "intro#part-2",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let links: Vec<String> = collect_outgoing_links(&raw, &base)
            .into_iter()
            .map(|u| u.to_string())
            .collect();

        assert_eq!(
            links,
            vec![
                "https://example.com/docs/intro",
                "https://example.com/about",
                "https://other.test/x",
            ]
        );
    }

    #[test]
    fn test_elapsed_millis_saturates() {
        assert_eq!(elapsed_millis(Duration::from_micros(1_999)), 1);
        assert_eq!(elapsed_millis(Duration::from_secs(3)), 3_000);
        assert_eq!(elapsed_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_in_flight_guard_finishes_on_drop() {
        let frontier = Frontier::new();
        frontier.seed(NormalizedUrl::parse("https://example.com/").unwrap());
        let _task = frontier.dequeue().unwrap();

        {
            let _guard = InFlight::new(&frontier);
        }

        assert!(frontier.is_done());
        assert_eq!(frontier.progress().processed, 1);
    }

    #[test]
    fn test_in_flight_guard_finishes_once() {
        let frontier = Frontier::new();
        frontier.seed(NormalizedUrl::parse("https://example.com/").unwrap());
        frontier.try_enqueue(NormalizedUrl::parse("https://example.com/a").unwrap(), 1);
        let _first = frontier.dequeue().unwrap();
        let _second = frontier.dequeue().unwrap();

        let guard = InFlight::new(&frontier);
        assert_eq!(guard.finish(), 1);
        assert_eq!(frontier.progress().in_flight, 1);
    }
}
