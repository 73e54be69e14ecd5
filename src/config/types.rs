use serde::Deserialize;

/// Default number of hops allowed beyond the seed
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default worker count
pub const DEFAULT_CONCURRENCY: u32 = 4;

/// Default pause after each completed fetch (milliseconds)
pub const DEFAULT_CRAWL_DELAY_MS: u64 = 100;

/// Default per-request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Passthrough proxy used when no template is configured
pub const DEFAULT_PROXY_TEMPLATE: &str = "https://api.allorigins.win/raw?url={url}";

/// Placeholder substituted with the encoded target URL
pub const PROXY_PLACEHOLDER: &str = "{url}";

/// Main configuration structure for Linkscope
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Crawl root; a bare host is prefixed with `https://`
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of hops beyond the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Number of concurrent workers
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Pause after every completed fetch (milliseconds)
    #[serde(rename = "crawl-delay", default = "default_crawl_delay")]
    pub crawl_delay: u64,

    /// Timeout for a single request (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Proxy URL pattern containing `{url}`
    #[serde(rename = "proxy-template", default)]
    pub proxy_template: Option<String>,

    /// Fetch targets directly instead of through a proxy
    #[serde(default)]
    pub direct: bool,

    /// Path extensions that are never crawled
    #[serde(rename = "asset-extensions", default)]
    pub asset_extensions: Option<Vec<String>>,

    /// Additional crawl roots (absolute, or relative to the seed)
    #[serde(rename = "known-urls", default)]
    pub known_urls: Vec<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Linkscope".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the markdown report file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: "./linkscope-report.md".to_string(),
        }
    }
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_concurrency() -> u32 {
    DEFAULT_CONCURRENCY
}

fn default_crawl_delay() -> u64 {
    DEFAULT_CRAWL_DELAY_MS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
