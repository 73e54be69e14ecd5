use crate::crawler::frontier::{CrawlProgress, Frontier};
use crate::crawler::store::{FailedSet, ResultStore};
use std::time::Instant;

/// Mutable state owned by one crawl run
///
/// Shared by reference between the workers of a single run and never
/// between runs.
#[derive(Debug)]
pub struct CrawlState {
    pub frontier: Frontier,
    pub results: ResultStore,
    pub failed: FailedSet,
    started: Instant,
}

impl CrawlState {
    pub fn new() -> Self {
        Self {
            frontier: Frontier::new(),
            results: ResultStore::new(),
            failed: FailedSet::new(),
            started: Instant::now(),
        }
    }

    pub fn progress(&self) -> CrawlProgress {
        self.frontier.progress()
    }

    /// Completed tasks per second since the state was created
    pub fn rate(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.progress().processed as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}
