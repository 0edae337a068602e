//! End-to-end clone of one site: crawl, assemble, summarize

use crate::config::Config;
use crate::crawler::{self, CrawlOptions, CrawlResult};
use crate::output::{self, AssembledSite};
use crate::render;
use crate::summarize;
use serde::Serialize;
use std::path::PathBuf;

/// Everything one clone invocation produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneOutcome {
    pub crawl: CrawlResult,
    pub site: AssembledSite,
    pub summary: String,
}

impl CloneOutcome {
    pub fn pages(&self) -> usize {
        self.crawl.records.len()
    }
}

/// Clones `url` into a fresh directory under the configured output root
///
/// A render session is launched for this call alone and closed once the
/// crawl finishes. Failing to launch it is the only crawl-side error; pages
/// that fail to load just leave the result shorter.
pub async fn clone_site(config: &Config, url: &str, max_pages: i64) -> crate::Result<CloneOutcome> {
    let output_root = PathBuf::from(&config.output.output_dir);
    tokio::fs::create_dir_all(&output_root).await?;

    let options = CrawlOptions::from_config(config);

    let mut renderer = render::launch(&config.render).await?;
    let crawl = crawler::crawl(renderer.as_mut(), url, max_pages, &options).await;
    if let Err(e) = renderer.close().await {
        tracing::warn!("Failed to close render session: {}", e);
    }

    // Assembly is blocking file IO
    let (crawl, site) = tokio::task::spawn_blocking(move || {
        let site = output::assemble(&crawl, &output_root);
        (crawl, site)
    })
    .await?;
    let site = site?;

    let summary = summarize::summarize_text(&config.summarizer, &crawl.combined_text()).await;

    tracing::info!(
        "Cloned {} ({} pages) into {}",
        url,
        crawl.records.len(),
        site.root_path.display()
    );

    Ok(CloneOutcome {
        crawl,
        site,
        summary,
    })
}
