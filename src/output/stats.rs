//! Site-wide statistics for a crawl outcome
//!
//! This module condenses a [`CrawlOutcome`] into the figures shown on stdout
//! and at the top of the markdown report.

use crate::analysis::{average_score_percent, ScoreLevel};
use crate::crawler::{CrawlOutcome, CrawlStatus};
use std::collections::BTreeMap;

/// Crawl summary statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub status: CrawlStatus,
    pub seed: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: i64,

    pub pages_crawled: usize,
    pub pages_failed: usize,
    pub orphan_count: usize,
    pub broken_link_count: usize,
    pub total_outgoing_links: usize,

    /// Average SEO score as a percentage, `None` without pages
    pub average_score: Option<f64>,

    /// Pages per score level
    pub score_levels: BTreeMap<ScoreLevel, usize>,

    /// Pages per crawl depth
    pub depth_breakdown: BTreeMap<u32, usize>,

    pub noindex_pages: usize,
    pub missing_h1: usize,
    pub missing_description: usize,
}

impl CrawlSummary {
    /// Computes the summary for an outcome
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut score_levels = BTreeMap::new();
        let mut depth_breakdown = BTreeMap::new();
        let mut summary = Self {
            status: outcome.status(),
            seed: outcome.seed.to_string(),
            started_at: outcome.started_at.to_rfc3339(),
            finished_at: outcome.finished_at.to_rfc3339(),
            duration_seconds: outcome.duration().num_seconds(),
            pages_crawled: outcome.pages.len(),
            pages_failed: outcome.failed_urls.len(),
            orphan_count: outcome.orphan_count,
            broken_link_count: outcome.broken_link_count,
            total_outgoing_links: 0,
            average_score: average_score_percent(&outcome.pages),
            score_levels: BTreeMap::new(),
            depth_breakdown: BTreeMap::new(),
            noindex_pages: 0,
            missing_h1: 0,
            missing_description: 0,
        };

        for page in &outcome.pages {
            *score_levels.entry(page.seo_score().level).or_insert(0) += 1;
            *depth_breakdown.entry(page.depth).or_insert(0) += 1;
            summary.total_outgoing_links += page.outgoing_links.len();

            if page.metrics.is_noindex {
                summary.noindex_pages += 1;
            }
            if page.metrics.h1.is_none() {
                summary.missing_h1 += 1;
            }
            if page.metrics.description.is_none() {
                summary.missing_description += 1;
            }
        }

        summary.score_levels = score_levels;
        summary.depth_breakdown = depth_breakdown;
        summary
    }

    /// Share of attempted URLs that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_crawled + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        self.pages_crawled as f64 / attempted as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `outcome` - The crawl outcome to summarize
pub fn print_statistics(outcome: &CrawlOutcome) {
    let summary = CrawlSummary::from_outcome(outcome);

    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Seed: {}", summary.seed);
    println!("  Status: {}", summary.status.as_str());
    println!("  Duration: {} seconds", summary.duration_seconds);
    println!("  Pages crawled: {}", summary.pages_crawled);
    println!("  Failed URLs: {}", summary.pages_failed);
    println!("  Outgoing links: {}", summary.total_outgoing_links);
    println!();

    println!("Link Graph:");
    println!("  Orphan pages: {}", summary.orphan_count);
    println!("  Broken links: {}", summary.broken_link_count);
    println!();

    if !summary.depth_breakdown.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &summary.depth_breakdown {
            println!("  {}: {}", depth, count);
        }
        println!();
    }

    if let Some(average) = summary.average_score {
        println!("SEO Score:");
        println!("  Average: {:.1}%", average);
        for (level, count) in summary.score_levels.iter().rev() {
            println!("  {}: {}", level, count);
        }
        println!();
    }

    match summary.status {
        CrawlStatus::NothingReachable => {
            println!("No page could be fetched. Check the seed URL and proxy settings.");
        }
        CrawlStatus::Incomplete => {
            println!(
                "Crawl was interrupted; results cover {} pages.",
                summary.pages_crawled
            );
        }
        CrawlStatus::Complete => {
            println!(
                "Success Rate: {:.1}% ({} / {} URLs fetched)",
                summary.success_rate(),
                summary.pages_crawled,
                summary.pages_crawled + summary.pages_failed
            );
        }
    }
}
