//! site-cloner: a bounded same-origin website cloner
//!
//! This crate crawls a handful of pages from one origin through a rendering
//! session, captures their HTML, visible text and screenshots, and assembles
//! them into a static, browsable clone with an optional generated summary.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod summarize;
pub mod url;

use thiserror::Error;

/// Invocation-level error for a clone request
///
/// Per-page crawl failures never surface here; they are recovered inside the
/// crawl loop. Only session startup, assembly and configuration problems do.
#[derive(Debug, Error)]
pub enum ClonerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render session error: {0}")]
    Render(#[from] render::RenderError),

    #[error("Site assembly error: {0}")]
    Assemble(#[from] output::AssembleError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Result type alias for clone operations
pub type Result<T> = std::result::Result<T, ClonerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOptions, CrawlResult, PageRecord};
pub use crate::url::{normalize, NormalizeOptions, NormalizedKey};
