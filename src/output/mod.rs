//! Output module for turning crawl results into a browsable static site
//!
//! This module handles:
//! - Creating a fresh timestamped directory per clone
//! - Writing one wrapper page per captured record
//! - Copying screenshots next to the pages and building an index gallery

mod site;

pub use site::{assemble, render_index, render_page, AssembledSite, PageEntry, INDEX_FILE};

use thiserror::Error;

/// Errors that can occur while assembling a site
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("Failed to create site directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, AssembleError>;
