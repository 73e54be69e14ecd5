//! Configuration module for Linkscope
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning them into the immutable [`CrawlConfig`] a crawl runs with.
//!
//! # Example
//!
//! ```no_run
//! use linkscope::config::{load_config, CrawlConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkscope.toml")).unwrap();
//! let crawl_config = CrawlConfig::from_config(&config).unwrap();
//! println!("Crawling {} to depth {}", crawl_config.seed, crawl_config.max_depth);
//! ```

mod parser;
mod runtime;
mod types;
mod validation;

// Re-export types
pub use runtime::CrawlConfig;
pub use types::{
    Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_CONCURRENCY,
    DEFAULT_CRAWL_DELAY_MS, DEFAULT_MAX_DEPTH, DEFAULT_PROXY_TEMPLATE,
    DEFAULT_REQUEST_TIMEOUT_SECS, PROXY_PLACEHOLDER,
};
pub use validation::{validate_proxy_template, MAX_CONCURRENCY};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
