//! Crawl frontier
//!
//! The frontier is the pending-work queue plus its dedup guard. A URL is
//! marked visited at the moment it is enqueued, never when it is fetched,
//! so concurrent workers discovering the same link can only enqueue it once.

use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A unit of pending work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: NormalizedUrl,
    pub depth: u32,
}

/// Read-only snapshot of frontier counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlProgress {
    /// Tasks completed (success or failure)
    pub processed: usize,
    /// Tasks waiting in the queue
    pub queued: usize,
    /// Tasks dequeued but not yet finished
    pub in_flight: usize,
    /// URLs ever enqueued
    pub discovered: usize,
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<NormalizedUrl>,
    in_flight: usize,
    processed: usize,
}

/// FIFO work queue with an at-most-once enqueue guarantee
///
/// Every operation takes the same lock, so the visited check-and-add in
/// [`Frontier::try_enqueue`] and the pop-and-mark in [`Frontier::dequeue`]
/// are each a single atomic step.
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        // Updates never span a panic point; poisoned state is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a root at depth 0
    ///
    /// Returns false if the URL was already enqueued.
    pub fn seed(&self, url: NormalizedUrl) -> bool {
        self.try_enqueue(url, 0)
    }

    /// Enqueues `url` at `depth` unless it has been enqueued before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - The URL was already visited; nothing changed
    pub fn try_enqueue(&self, url: NormalizedUrl, depth: u32) -> bool {
        let mut inner = self.lock();
        if !inner.visited.insert(url.clone()) {
            return false;
        }
        inner.queue.push_back(CrawlTask { url, depth });
        true
    }

    /// Pops the oldest task and marks it in flight
    ///
    /// Every task returned here must be matched by one call to
    /// [`Frontier::finish`].
    pub fn dequeue(&self) -> Option<CrawlTask> {
        let mut inner = self.lock();
        let task = inner.queue.pop_front()?;
        inner.in_flight += 1;
        Some(task)
    }

    /// Marks one in-flight task as finished and returns the processed count
    pub fn finish(&self) -> usize {
        let mut inner = self.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        inner.processed += 1;
        inner.processed
    }

    /// Termination predicate: nothing queued and nothing in flight
    ///
    /// Once true it stays true, since only in-flight tasks enqueue new work.
    pub fn is_done(&self) -> bool {
        let inner = self.lock();
        inner.queue.is_empty() && inner.in_flight == 0
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.lock().visited.contains(url)
    }

    pub fn progress(&self) -> CrawlProgress {
        let inner = self.lock();
        CrawlProgress {
            processed: inner.processed,
            queued: inner.queue.len(),
            in_flight: inner.in_flight,
            discovered: inner.visited.len(),
        }
    }
}
