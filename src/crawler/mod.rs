//! Crawler module for bounded same-origin traversal
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier and its membership rules
//! - Per-page visits through an injected render session
//! - Overall crawl coordination under a page budget

mod coordinator;
mod frontier;
mod types;

pub use coordinator::{Coordinator, SkipReason, Visit, VisitOutcome};
pub use frontier::Frontier;
pub use types::{
    page_budget, CrawlOptions, CrawlResult, FrontierDedup, PageRecord, DEFAULT_MAX_PAGES,
};

use crate::render::Renderer;

/// Runs a complete crawl on an already launched render session
///
/// This is the main entry point for crawling. It will:
/// 1. Seed the frontier with `start_url`
/// 2. Visit queued URLs one at a time in breadth-first order
/// 3. Follow links that stay on the landed page's origin
/// 4. Stop once `max_pages` pages are captured or nothing is left to visit
///
/// A `max_pages` of zero or below performs no navigation at all. Pages that
/// fail to load are skipped; the crawl itself never fails. The caller owns
/// the session and is responsible for closing it.
pub async fn crawl<R>(
    renderer: &mut R,
    start_url: &str,
    max_pages: i64,
    options: &CrawlOptions,
) -> CrawlResult
where
    R: Renderer + ?Sized,
{
    let budget = page_budget(max_pages);
    if budget == 0 {
        tracing::info!("Page budget is {}, nothing to crawl", max_pages);
        return CrawlResult {
            start_url: start_url.to_string(),
            records: Vec::new(),
        };
    }

    Coordinator::new(start_url, options.clone())
        .run(renderer, budget)
        .await
}
