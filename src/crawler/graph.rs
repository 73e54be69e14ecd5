//! Post-crawl link-graph analysis
//!
//! Runs once, after the worker pool has drained, over the complete result
//! store and failed set. This is the only place page records are mutated.

use crate::crawler::store::PageRecord;
use crate::url::NormalizedUrl;
use crate::FetchError;
use std::collections::HashMap;

/// Graph-derived values attached to each page record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkGraphMetrics {
    /// No crawled page links here, and this is not the seed
    pub is_orphan: bool,

    /// Number of crawled pages linking here, including the page itself
    pub internal_link_equity: u32,

    /// Outgoing links of this page whose fetch failed
    pub broken_links_on_page: Vec<NormalizedUrl>,
}

/// Site-wide totals from one link-graph pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkGraphSummary {
    pub orphan_count: usize,

    /// Broken-link references summed over all pages
    pub broken_link_count: usize,

    /// Edges counted toward link equity
    pub internal_edges: usize,
}

/// Annotates every page with orphan status, link equity and broken links
///
/// An edge counts toward the target's equity when the target is a crawled
/// page. A page linking to itself counts too. Outgoing links are already unique per page,
/// so each source contributes at most one to any target.
///
/// # Arguments
///
/// * `pages` - All crawled pages, keyed by normalized URL
/// * `failed` - URLs whose fetch failed
/// * `seed` - The crawl root, which is never an orphan
pub fn analyze_link_graph(
    pages: &mut HashMap<NormalizedUrl, PageRecord>,
    failed: &HashMap<NormalizedUrl, FetchError>,
    seed: &NormalizedUrl,
) -> LinkGraphSummary {
    let mut inbound: HashMap<NormalizedUrl, u32> = HashMap::new();
    let mut internal_edges = 0;

    for page in pages.values() {
        for link in &page.outgoing_links {
            if pages.contains_key(link) {
                *inbound.entry(link.clone()).or_default() += 1;
                internal_edges += 1;
            }
        }
    }

    let mut summary = LinkGraphSummary {
        internal_edges,
        ..Default::default()
    };

    for (url, page) in pages.iter_mut() {
        let equity = inbound.get(url).copied().unwrap_or(0);
        let broken: Vec<NormalizedUrl> = page
            .outgoing_links
            .iter()
            .filter(|link| failed.contains_key(*link))
            .cloned()
            .collect();

        page.link_graph = LinkGraphMetrics {
            is_orphan: equity == 0 && url != seed,
            internal_link_equity: equity,
            broken_links_on_page: broken,
        };

        if page.link_graph.is_orphan {
            summary.orphan_count += 1;
        }
        summary.broken_link_count += page.link_graph.broken_links_on_page.len();
    }

    summary
}
