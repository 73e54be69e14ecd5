//! Output module for crawl reports
//!
//! This module handles:
//! - Summarizing a crawl outcome into site-wide statistics
//! - Generating the markdown audit report
//! - Printing statistics to stdout

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_statistics, CrawlSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
