//! Configuration module for site-cloner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is equivalent to an
//! empty one.
//!
//! # Example
//!
//! ```no_run
//! use site_cloner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cloner.toml")).unwrap();
//! println!("Clones are written to: {}", config.output.output_dir);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FrontierDedupSetting, OutputConfig, RenderBackend, RenderConfig,
    ServerConfig, SummarizerConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
