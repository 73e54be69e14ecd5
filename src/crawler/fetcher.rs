//! HTTP fetcher implementation
//!
//! This module handles all outbound requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Rewriting targets through the proxy template
//! - Treating non-2xx responses as failures
//! - Error classification

use crate::config::PROXY_PLACEHOLDER;
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// How outbound requests reach their target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRoute {
    /// Request the target URL itself
    Direct,

    /// Request the template with `{url}` replaced by the percent-encoded target
    Proxy(String),
}

impl FetchRoute {
    /// Returns the URL that is actually requested for `target`
    ///
    /// # Example
    ///
    /// ```
    /// use linkscope::crawler::FetchRoute;
    /// use url::Url;
    ///
    /// let route = FetchRoute::Proxy("https://proxy.test/raw?url={url}".to_string());
    /// let target = Url::parse("https://example.com/a?b=1").unwrap();
    /// assert_eq!(
    ///     route.request_url(&target).unwrap().as_str(),
    ///     "https://proxy.test/raw?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1"
    /// );
    /// ```
    pub fn request_url(&self, target: &Url) -> Result<Url, FetchError> {
        match self {
            Self::Direct => Ok(target.clone()),
            Self::Proxy(template) => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(target.as_str().as_bytes()).collect();
                let rewritten = template.replace(PROXY_PLACEHOLDER, &encoded);
                Url::parse(&rewritten).map_err(|e| FetchError::Proxy(format!("{}: {}", rewritten, e)))
            }
        }
    }

    pub fn is_proxied(&self) -> bool {
        matches!(self, Self::Proxy(_))
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Base URL for resolving relative links in the body
    ///
    /// The target URL after redirects for direct fetches. Proxied fetches
    /// report the target itself since redirects happen behind the proxy.
    pub final_url: Url,

    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Response body
    pub body: String,

    /// Time from sending the request to reading the full body
    pub elapsed: Duration,
}

/// Fetches pages for the crawler
///
/// Implementations must treat non-2xx responses as errors.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

impl<T: Fetcher> Fetcher for Arc<T> {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        (**self).fetch(url)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The `User-Agent` header value
/// * `timeout` - Total timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use linkscope::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("Linkscope/0.1", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    route: FetchRoute,
}

impl HttpFetcher {
    pub fn new(client: Client, route: FetchRoute) -> Self {
        Self { client, route }
    }

    pub fn route(&self) -> &FetchRoute {
        &self.route
    }
}

impl Fetcher for HttpFetcher {
    /// Fetches a URL and classifies failures
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Non-2xx status | `FetchError::Status` |
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused | `FetchError::Connect` |
    /// | Body read failure | `FetchError::Body` |
    /// | Bad proxy rewrite | `FetchError::Proxy` |
    /// | Anything else | `FetchError::Network` |
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let request_url = self.route.request_url(url)?;
        let start = Instant::now();

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let final_url = if self.route.is_proxied() {
            url.clone()
        } else {
            response.url().clone()
        };

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
            elapsed: start.elapsed(),
        })
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Network(e.to_string())
    }
}
