//! URL handling module for site-cloner
//!
//! This module provides the dedup key normalization used by the crawl loop,
//! plus origin comparison and link resolution helpers.

mod normalize;
mod origin;

// Re-export main functions
pub use normalize::{normalize, normalize_url, NormalizeOptions, NormalizedKey};
pub use origin::{origin_of, origin_url, resolve_link, same_origin};
