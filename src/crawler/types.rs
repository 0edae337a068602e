//! Crawl inputs and outputs

use crate::config::{Config, FrontierDedupSetting};
use crate::url::NormalizeOptions;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Page budget used when the caller does not name one
pub const DEFAULT_MAX_PAGES: i64 = 3;

/// Captured artifacts for one successfully visited page
///
/// Built once by the crawl loop and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    url: String,
    html: String,
    text: String,
    screenshot_path: PathBuf,
}

impl PageRecord {
    pub fn new(
        url: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
        screenshot_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            text: text.into(),
            screenshot_path: screenshot_path.into(),
        }
    }

    /// The URL as it was dequeued, not its normalized key
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Visible text of the page body
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the screenshot was meant to be written; the file may be absent
    pub fn screenshot_path(&self) -> &Path {
        &self.screenshot_path
    }
}

/// Result of one crawl invocation
///
/// `records` is in completion order, which for a sequential crawl is
/// breadth-first discovery order minus skipped pages. An empty list is a
/// valid result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub start_url: String,
    pub records: Vec<PageRecord>,
}

impl CrawlResult {
    /// Concatenates the visible text of every record, separated by blank lines
    pub fn combined_text(&self) -> String {
        self.records
            .iter()
            .map(PageRecord::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// How the frontier decides a candidate is already queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontierDedup {
    /// Exact string comparison of raw URLs; variants that normalize to the
    /// same key may both be queued and are caught at dequeue time
    Raw,
    /// Comparison by normalized key
    #[default]
    Normalized,
}

impl From<FrontierDedupSetting> for FrontierDedup {
    fn from(setting: FrontierDedupSetting) -> Self {
        match setting {
            FrontierDedupSetting::Raw => FrontierDedup::Raw,
            FrontierDedupSetting::Normalized => FrontierDedup::Normalized,
        }
    }
}

/// Per-crawl settings
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Overall bound on a single navigation
    pub navigation_timeout: Duration,

    /// Pause after navigation so client-side rendering can finish
    pub settle_delay: Duration,

    /// Directory screenshots are written into
    pub screenshot_dir: PathBuf,

    pub normalize: NormalizeOptions,

    pub frontier_dedup: FrontierDedup,

    /// Element whose visible text is captured
    pub text_selector: String,

    /// Elements whose `href` targets are followed
    pub link_selector: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(500),
            screenshot_dir: PathBuf::from("./output"),
            normalize: NormalizeOptions::default(),
            frontier_dedup: FrontierDedup::default(),
            text_selector: "body".to_string(),
            link_selector: "a[href]".to_string(),
        }
    }
}

impl CrawlOptions {
    /// Builds crawl options from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            navigation_timeout: Duration::from_millis(config.crawler.navigation_timeout_ms),
            settle_delay: Duration::from_millis(config.crawler.settle_delay_ms),
            screenshot_dir: PathBuf::from(&config.output.output_dir),
            normalize: NormalizeOptions {
                query_sensitive: config.crawler.query_sensitive,
            },
            frontier_dedup: config.crawler.frontier_dedup.into(),
            ..Self::default()
        }
    }
}

/// Converts a signed page budget into a count; zero and negatives mean none
pub fn page_budget(max_pages: i64) -> usize {
    usize::try_from(max_pages).unwrap_or(0)
}
