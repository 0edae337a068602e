//! Crawl coordinator - the bounded breadth-first traversal
//!
//! This module contains the crawl loop that:
//! - Pops URLs from the frontier in discovery order
//! - Discards malformed and already-visited URLs without spending budget
//! - Visits each remaining URL through the render session
//! - Queues same-origin links found on successfully visited pages
//! - Stops when the frontier is empty or the page budget is spent
//!
//! A failed visit never ends the crawl. Each attempt produces a
//! [`VisitOutcome`], and only `Success` touches the visited set or records.

use crate::crawler::frontier::Frontier;
use crate::crawler::types::{CrawlOptions, CrawlResult, PageRecord};
use crate::render::{RenderError, Renderer};
use crate::url::{
    normalize, normalize_url, origin_of, origin_url, resolve_link, same_origin, NormalizedKey,
};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use url::Url;

/// Artifacts gathered from one successful visit
#[derive(Debug)]
pub struct Visit {
    pub record: PageRecord,
    /// Where the session actually landed, after redirects
    pub landed: Url,
    /// Raw hyperlink targets found on the page
    pub links: Vec<String>,
}

/// Why a visit attempt produced no record
#[derive(Debug)]
pub enum SkipReason {
    /// Navigation did not finish within the per-page timeout
    Timeout(Duration),
    /// The render session failed to load the page
    Navigation(RenderError),
    /// The page loaded but its content could not be read
    Extraction(RenderError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Timeout(limit) => write!(f, "navigation timed out after {:?}", limit),
            SkipReason::Navigation(e) => write!(f, "navigation failed: {}", e),
            SkipReason::Extraction(e) => write!(f, "extraction failed: {}", e),
        }
    }
}

/// Result of a single visit attempt
#[derive(Debug)]
pub enum VisitOutcome {
    Success(Visit),
    Skipped(SkipReason),
}

/// Owns the traversal state for one crawl invocation
pub struct Coordinator {
    options: CrawlOptions,
    start_url: String,
    frontier: Frontier,
    visited: HashSet<NormalizedKey>,
    records: Vec<PageRecord>,
}

impl Coordinator {
    /// Creates a coordinator with `start_url` as the only frontier entry
    ///
    /// A start URL that fails normalization is never queued, so the crawl
    /// finishes immediately with no records.
    pub fn new(start_url: &str, options: CrawlOptions) -> Self {
        let mut frontier = Frontier::new(options.frontier_dedup);

        match normalize_url(start_url, &options.normalize) {
            Ok(key) => {
                frontier.push(start_url.to_string(), &key);
            }
            Err(e) => tracing::warn!("Start URL {} is unusable: {}", start_url, e),
        }

        Self {
            options,
            start_url: start_url.to_string(),
            frontier,
            visited: HashSet::new(),
            records: Vec::new(),
        }
    }

    /// Runs the crawl loop until the frontier empties or `max_pages` records exist
    ///
    /// Pages are visited strictly one at a time on the borrowed session.
    pub async fn run<R>(mut self, renderer: &mut R, max_pages: usize) -> CrawlResult
    where
        R: Renderer + ?Sized,
    {
        tracing::info!(
            "Starting crawl of {} (budget: {} pages)",
            self.start_url,
            max_pages
        );
        let start_time = Instant::now();
        let mut attempts = 0usize;

        while self.records.len() < max_pages {
            let Some(url) = self.frontier.pop() else {
                tracing::debug!("Frontier is empty");
                break;
            };

            let key = match normalize_url(&url, &self.options.normalize) {
                Ok(key) => key,
                Err(e) => {
                    tracing::debug!("Discarding {}: {}", url, e);
                    continue;
                }
            };

            if self.visited.contains(&key) {
                tracing::debug!("Already visited {}, discarding {}", key, url);
                continue;
            }

            attempts += 1;
            match self.visit(renderer, &url).await {
                VisitOutcome::Success(visit) => self.accept(key, visit),
                VisitOutcome::Skipped(reason) => {
                    tracing::warn!("Skipping {}: {}", url, reason);
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages captured from {} attempts in {:?} ({} left in frontier)",
            self.records.len(),
            attempts,
            start_time.elapsed(),
            self.frontier.len()
        );

        CrawlResult {
            start_url: self.start_url,
            records: self.records,
        }
    }

    /// Makes one visit attempt and tags its result
    pub async fn visit<R>(&self, renderer: &mut R, url: &str) -> VisitOutcome
    where
        R: Renderer + ?Sized,
    {
        match self.try_visit(renderer, url).await {
            Ok(visit) => VisitOutcome::Success(visit),
            Err(reason) => VisitOutcome::Skipped(reason),
        }
    }

    async fn try_visit<R>(&self, renderer: &mut R, url: &str) -> Result<Visit, SkipReason>
    where
        R: Renderer + ?Sized,
    {
        let requested = Url::parse(url).map_err(|e| {
            SkipReason::Navigation(RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;

        let limit = self.options.navigation_timeout;
        tokio::time::timeout(limit, renderer.navigate(url))
            .await
            .map_err(|_| SkipReason::Timeout(limit))?
            .map_err(SkipReason::Navigation)?;

        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }

        let html = renderer
            .full_html()
            .await
            .map_err(SkipReason::Extraction)?;
        let text = renderer
            .visible_text(&self.options.text_selector)
            .await
            .map_err(SkipReason::Extraction)?;

        let screenshot_path = self.screenshot_path();
        match renderer.capture_screenshot(&screenshot_path).await {
            Ok(()) => {}
            Err(RenderError::Unsupported(what)) => {
                tracing::debug!("No screenshot of {}: {} not supported", url, what)
            }
            Err(e) => tracing::warn!("Screenshot of {} not saved: {}", url, e),
        }

        let links = renderer
            .extract_links(&self.options.link_selector)
            .await
            .map_err(SkipReason::Extraction)?;

        let landed = self.landed_url(renderer, requested).await;

        Ok(Visit {
            record: PageRecord::new(url, html, text, screenshot_path),
            landed,
            links,
        })
    }

    /// Resolves where the session ended up, falling back to the requested URL
    async fn landed_url<R>(&self, renderer: &mut R, requested: Url) -> Url
    where
        R: Renderer + ?Sized,
    {
        let reported = match renderer.current_url().await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!("Could not read landed URL for {}: {}", requested, e);
                None
            }
        };

        let landed = reported
            .and_then(|current| Url::parse(&current).ok())
            .filter(|url| url.origin().is_tuple());

        match landed {
            Some(landed) => {
                if !same_origin(&landed, &requested) {
                    tracing::info!(
                        "{} landed on {}, following links within {}",
                        requested,
                        landed,
                        origin_of(&landed)
                    );
                }
                landed
            }
            None => requested,
        }
    }

    /// Queues same-origin links, then marks the page visited and keeps its record
    fn accept(&mut self, key: NormalizedKey, visit: Visit) {
        let Visit {
            record,
            landed,
            links,
        } = visit;

        let mut queued = 0usize;
        if let Some(base) = origin_url(&landed) {
            for href in &links {
                let Some(link) = resolve_link(href, &base) else {
                    tracing::debug!("Dropping unresolvable link {:?} on {}", href, landed);
                    continue;
                };

                if !same_origin(&link, &landed) {
                    continue;
                }

                let Some(link_key) = normalize(link.as_str(), &self.options.normalize) else {
                    continue;
                };

                if self.visited.contains(&link_key) {
                    continue;
                }

                if self.frontier.push(link.into(), &link_key) {
                    queued += 1;
                }
            }
        }

        tracing::info!(
            "Captured page {}: {} ({} links, {} queued)",
            self.records.len() + 1,
            record.url(),
            links.len(),
            queued
        );

        self.visited.insert(key);
        self.records.push(record);
    }

    /// Screenshot path unique within this crawl: timestamp plus record count
    fn screenshot_path(&self) -> PathBuf {
        let file_name = format!(
            "screenshot-{}-{}.png",
            chrono::Utc::now().timestamp_millis(),
            self.records.len()
        );
        self.options.screenshot_dir.join(file_name)
    }
}
