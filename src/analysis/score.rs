use crate::analysis::PageMetrics;
use crate::crawler::{LinkGraphMetrics, PageRecord};
use std::fmt;

/// Number of checks contributing to the score
pub const MAX_SEO_SCORE: u32 = 9;

/// Qualitative level derived from the score percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreLevel {
    /// Below 50%
    NeedsReview,
    /// 50% or more
    Good,
    /// 80% or more
    Excellent,
}

impl ScoreLevel {
    fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Excellent
        } else if percentage >= 50.0 {
            Self::Good
        } else {
            Self::NeedsReview
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsReview => "Needs review",
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bounded SEO score for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeoScore {
    pub score: u32,
    pub max_score: u32,
    pub level: ScoreLevel,
}

impl SeoScore {
    pub fn percentage(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        self.score as f64 / self.max_score as f64 * 100.0
    }
}

/// Scores a page by counting satisfied checks
///
/// # Checks
///
/// | Check | Passes when |
/// |-------|-------------|
/// | H1 | an `<h1>` with text exists |
/// | Canonical | a canonical link is declared |
/// | Image alts | the page has images and none lacks alt text |
/// | Broken links | no outgoing link points at a failed URL |
/// | Indexable | no `noindex` robots directive |
/// | Language | `<html lang>` is declared |
/// | Open Graph | both `og:title` and `og:image` are present |
/// | Structured data | a JSON-LD block exists |
/// | Content length | word count meets the page type's threshold |
pub fn calculate_seo_score(metrics: &PageMetrics, link_graph: &LinkGraphMetrics) -> SeoScore {
    let checks = [
        metrics.h1.is_some(),
        metrics.canonical.is_some(),
        metrics.image_alt.fully_tagged(),
        link_graph.broken_links_on_page.is_empty(),
        !metrics.is_noindex,
        metrics.lang.is_some(),
        metrics.og_title.is_some() && metrics.og_image.is_some(),
        metrics.has_structured_data,
        metrics.word_count >= metrics.page_type.min_word_count(),
    ];

    let score = checks.iter().filter(|passed| **passed).count() as u32;
    let percentage = score as f64 / MAX_SEO_SCORE as f64 * 100.0;

    SeoScore {
        score,
        max_score: MAX_SEO_SCORE,
        level: ScoreLevel::from_percentage(percentage),
    }
}

impl PageRecord {
    /// Scores this page using its metrics and link-graph annotations
    pub fn seo_score(&self) -> SeoScore {
        calculate_seo_score(&self.metrics, &self.link_graph)
    }
}

/// Site-wide average score as a percentage, `None` for an empty crawl
pub fn average_score_percent(pages: &[PageRecord]) -> Option<f64> {
    if pages.is_empty() {
        return None;
    }

    let (total, max) = pages.iter().map(PageRecord::seo_score).fold((0u64, 0u64), |acc, s| {
        (acc.0 + s.score as u64, acc.1 + s.max_score as u64)
    });

    Some(total as f64 / max as f64 * 100.0)
}
