//! URL handling module for Linkscope
//!
//! This module provides the canonical URL key used for deduplication and
//! the scope rules deciding which discovered links are crawled.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{normalize, parse_seed, NormalizedUrl};
pub use scope::{is_in_scope, AssetDenylist, DEFAULT_ASSET_EXTENSIONS};
