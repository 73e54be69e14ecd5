/// Page type inferred from the URL, used to pick a word-count threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageType {
    Article,
    Product,
    Homepage,
    About,
    Contact,
    #[default]
    Generic,
}

impl PageType {
    /// Infers the page type from a URL string
    ///
    /// Checked in order: `/blog/` or `/article/`, `/product`, `/contact`,
    /// `/about`, then the site root (or an `index.html` file).
    pub fn from_url(url: &url::Url) -> Self {
        let lowered = url.as_str().to_lowercase();
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");

        if lowered.contains("/blog/") || lowered.contains("/article/") {
            Self::Article
        } else if lowered.contains("/product") {
            Self::Product
        } else if lowered.contains("/contact") {
            Self::Contact
        } else if lowered.contains("/about") {
            Self::About
        } else if url.path() == "/" || file_name.eq_ignore_ascii_case("index.html") {
            Self::Homepage
        } else {
            Self::Generic
        }
    }

    /// Minimum word count for the content-length check
    pub fn min_word_count(&self) -> usize {
        match self {
            Self::Article => 500,
            Self::Product => 250,
            Self::Homepage => 250,
            Self::About => 50,
            Self::Contact => 50,
            Self::Generic => 300,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Product => "product",
            Self::Homepage => "homepage",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Generic => "generic",
        }
    }
}

/// Image alt-text coverage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageAltInfo {
    pub total: usize,
    pub missing: usize,
}

impl ImageAltInfo {
    /// True when the page has images and every one has alt text
    pub fn fully_tagged(&self) -> bool {
        self.total > 0 && self.missing == 0
    }
}

/// Link and readability figures for the page body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentAnalysis {
    pub internal_links: usize,
    pub external_links: usize,
    /// Flesch reading-ease approximation, `None` without sentences
    pub readability_score: Option<f64>,
}

/// Page weight figures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceInfo {
    pub page_size_kb: f64,
    pub scripts: usize,
    pub stylesheets: usize,
    pub images: usize,
}

/// Accessibility figures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityInfo {
    pub form_fields: usize,
    pub unlabeled_fields: usize,
    pub has_header: bool,
    pub has_nav: bool,
    pub has_main: bool,
}

/// Page-level SEO, content and accessibility metrics
///
/// Produced once per fetched page by a [`PageAnalyzer`](super::PageAnalyzer).
/// The crawler never modifies it; link-graph figures live next to it on the
/// page record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMetrics {
    pub title: String,
    pub description: Option<String>,
    /// The description, or `Page {title}` when the page has none
    pub summary: String,
    pub keywords: Vec<String>,
    /// The keywords, or words taken from the URL path when the page has none
    pub tags: Vec<String>,
    pub h1: Option<String>,
    pub lang: Option<String>,
    pub canonical: Option<String>,
    pub image_alt: ImageAltInfo,
    pub load_time_ms: Option<u64>,
    pub is_noindex: bool,
    pub og_title: Option<String>,
    pub og_image: Option<String>,
    pub has_structured_data: bool,
    pub word_count: usize,
    pub page_type: PageType,
    pub content: ContentAnalysis,
    pub performance: PerformanceInfo,
    pub accessibility: AccessibilityInfo,
}
