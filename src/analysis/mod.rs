//! Page analysis module
//!
//! This module turns fetched HTML into page metrics and raw links, and
//! scores pages once the link graph has been annotated.
//!
//! The crawler only depends on the [`PageAnalyzer`] trait; [`HtmlAnalyzer`]
//! is the default implementation.

mod html;
mod metrics;
mod score;

pub use html::HtmlAnalyzer;
pub use metrics::{
    AccessibilityInfo, ContentAnalysis, ImageAltInfo, PageMetrics, PageType, PerformanceInfo,
};
pub use score::{average_score_percent, calculate_seo_score, ScoreLevel, SeoScore, MAX_SEO_SCORE};

use url::Url;

/// Options passed alongside a page to the analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Time taken to fetch the page
    pub elapsed_ms: Option<u64>,
}

/// Page-level analysis used by the crawler
///
/// Both operations are pure with respect to crawl state: they see only the
/// document and its URL.
pub trait PageAnalyzer: Send + Sync + 'static {
    /// Computes page metrics for a fetched document
    fn analyze_page(&self, html: &str, url: &Url, options: AnalyzeOptions) -> PageMetrics;

    /// Returns the raw `href` values of every anchor in the document
    fn extract_links(&self, html: &str, base_url: &Url) -> Vec<String>;
}
