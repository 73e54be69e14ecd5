//! Linkscope: a same-origin crawler and link-graph auditor
//!
//! This crate crawls every in-scope page reachable from a seed address up to a
//! depth bound, fetches and analyzes each page exactly once, and then derives
//! site-wide link-graph metrics: orphan pages, internal link equity and
//! broken-link attribution.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Linkscope operations
#[derive(Debug, Error)]
pub enum LinkscopeError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors produced by a single page fetch
///
/// These never unwind the worker pool; they are recorded against the URL
/// in the failed set and the crawl continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection refused")]
    Connect,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("Invalid proxy target: {0}")]
    Proxy(String),
}

/// Result type alias for Linkscope operations
pub type Result<T> = std::result::Result<T, LinkscopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlConfig, CrawlOutcome, CrawlStatus, PageRecord};
pub use crate::url::{normalize, NormalizedUrl};
