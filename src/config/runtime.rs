use crate::config::types::{
    Config, DEFAULT_CONCURRENCY, DEFAULT_CRAWL_DELAY_MS, DEFAULT_MAX_DEPTH,
    DEFAULT_PROXY_TEMPLATE, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::config::types::UserAgentConfig;
use crate::config::validation::validate;
use crate::crawler::FetchRoute;
use crate::url::{normalize, parse_seed, AssetDenylist, NormalizedUrl};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;

/// Immutable settings for a single crawl run
///
/// Built from a validated [`Config`] or directly from a seed with defaults.
/// The worker pool never mutates it; one instance is shared by every worker
/// of one crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Crawl root, processed at depth 0 and exempt from orphan status
    pub seed: NormalizedUrl,

    /// Additional depth-0 roots
    pub known_urls: Vec<NormalizedUrl>,

    /// Maximum number of hops beyond a root
    pub max_depth: u32,

    /// Number of concurrent workers (values below 1 are treated as 1)
    pub concurrency: usize,

    /// Pause after every completed fetch
    pub crawl_delay: Duration,

    /// Timeout for a single request
    pub request_timeout: Duration,

    /// How outbound requests reach their target
    pub route: FetchRoute,

    /// Path extensions that are never crawled
    pub asset_denylist: AssetDenylist,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl CrawlConfig {
    /// Creates a configuration for `seed` with default settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the seed does not parse as an
    /// absolute URL even after `https://` prefixing.
    ///
    /// # Example
    ///
    /// ```
    /// use linkscope::CrawlConfig;
    ///
    /// let config = CrawlConfig::new("example.com").unwrap();
    /// assert_eq!(config.seed.as_str(), "https://example.com/");
    /// assert!(CrawlConfig::new("https://").is_err());
    /// ```
    pub fn new(seed: &str) -> ConfigResult<Self> {
        let seed = parse_seed(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed '{}': {}", seed, e)))?;

        Ok(Self {
            seed,
            known_urls: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY as usize,
            crawl_delay: Duration::from_millis(DEFAULT_CRAWL_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            route: FetchRoute::Proxy(DEFAULT_PROXY_TEMPLATE.to_string()),
            asset_denylist: AssetDenylist::default(),
            user_agent: UserAgentConfig::default().header_value(),
        })
    }

    /// Builds the runtime configuration from a configuration file
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        validate(config)?;

        let crawler = &config.crawler;
        let mut runtime = Self::new(&crawler.seed_url)?;

        runtime.known_urls = crawler
            .known_urls
            .iter()
            .map(|raw| {
                normalize(raw, runtime.seed.resolved())
                    .ok_or_else(|| ConfigError::InvalidUrl(format!("Invalid known URL '{}'", raw)))
            })
            .collect::<Result<_, _>>()?;

        runtime.max_depth = crawler.max_depth;
        runtime.concurrency = crawler.concurrency as usize;
        runtime.crawl_delay = Duration::from_millis(crawler.crawl_delay);
        runtime.request_timeout = Duration::from_secs(crawler.request_timeout);
        runtime.route = if crawler.direct {
            FetchRoute::Direct
        } else {
            FetchRoute::Proxy(
                crawler
                    .proxy_template
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PROXY_TEMPLATE.to_string()),
            )
        };
        if let Some(extensions) = &crawler.asset_extensions {
            runtime.asset_denylist = AssetDenylist::new(extensions);
        }
        runtime.user_agent = config.user_agent.header_value();

        Ok(runtime)
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_crawl_delay(mut self, delay: Duration) -> Self {
        self.crawl_delay = delay;
        self
    }

    pub fn with_route(mut self, route: FetchRoute) -> Self {
        self.route = route;
        self
    }

    pub fn with_known_urls(mut self, known_urls: Vec<NormalizedUrl>) -> Self {
        self.known_urls = known_urls;
        self
    }
}
