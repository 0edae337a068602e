//! Headless Chrome render backend
//!
//! One browser process and one tab per session. The DevTools event handler
//! runs on a background task for the lifetime of the session. Each session
//! runs on its own throwaway profile directory so concurrent sessions never
//! contend for one profile.

use crate::config::RenderConfig;
use crate::render::{RenderError, Renderer};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;

const PROFILE_DIR_PREFIX: &str = "site-cloner-chrome-";

/// Render session backed by a headless Chrome process
pub struct ChromeRenderer {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    network_idle_timeout: Duration,
    closed: bool,
    // Declared last so the directory outlives the browser on drop
    profile: Option<TempDir>,
}

/// Creates an empty, uniquely named Chrome profile directory
///
/// The directory is removed when the returned guard is dropped.
fn new_profile_dir() -> Result<TempDir, RenderError> {
    tempfile::Builder::new()
        .prefix(PROFILE_DIR_PREFIX)
        .tempdir()
        .map_err(|e| RenderError::Launch(format!("Failed to create browser profile: {}", e)))
}

impl ChromeRenderer {
    /// Starts Chrome and opens a blank tab
    ///
    /// If the tab cannot be opened the browser process is shut down before
    /// the error is returned.
    pub async fn launch(config: &RenderConfig) -> Result<Self, RenderError> {
        let profile = new_profile_dir()?;
        tracing::debug!("Using browser profile {}", profile.path().display());

        let mut builder = BrowserConfig::builder().user_data_dir(profile.path());
        for arg in &config.chrome_args {
            builder = builder.arg(arg.as_str());
        }
        builder = builder.arg(format!("--user-agent={}", config.user_agent));

        let browser_config = builder.build().map_err(RenderError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::warn!("Failed to close browser after setup error: {}", close_err);
                }
                handler.abort();
                return Err(RenderError::Launch(e.to_string()));
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
            network_idle_timeout: Duration::from_millis(config.network_idle_timeout_ms),
            closed: false,
            profile: Some(profile),
        })
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        // goto returns on the load event; late requests get a bounded grace period
        match tokio::time::timeout(self.network_idle_timeout, self.page.wait_for_navigation()).await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::debug!("Waiting for {} to settle failed: {}", url, e),
            Err(_) => tracing::debug!("Network for {} still busy after idle timeout", url),
        }

        Ok(())
    }

    async fn current_url(&mut self) -> Result<Option<String>, RenderError> {
        Ok(self.page.url().await?)
    }

    async fn full_html(&mut self) -> Result<String, RenderError> {
        Ok(self.page.content().await?)
    }

    async fn visible_text(&mut self, selector: &str) -> Result<String, RenderError> {
        let element = self.page.find_element(selector).await?;
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), RenderError> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }

    async fn extract_links(&mut self, selector: &str) -> Result<Vec<String>, RenderError> {
        let elements = self.page.find_elements(selector).await?;

        let mut links = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(href) = element.attribute("href").await? {
                if !href.is_empty() {
                    links.push(href);
                }
            }
        }

        Ok(links)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();

        if let Some(profile) = self.profile.take() {
            let path = profile.path().display().to_string();
            if let Err(e) = profile.close() {
                tracing::debug!("Failed to remove browser profile {}: {}", path, e);
            }
        }

        result.map(|_| ()).map_err(RenderError::from)
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        // Browser kills its child process on drop; the handler task would
        // otherwise outlive it
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_session_gets_its_own_profile_dir() {
        let first = new_profile_dir().unwrap();
        let second = new_profile_dir().unwrap();

        assert_ne!(first.path(), second.path());
        for dir in [&first, &second] {
            assert!(dir.path().is_dir());
            assert!(dir
                .path()
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(PROFILE_DIR_PREFIX)));
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        }
    }

    #[test]
    fn test_profile_dir_is_removed_with_its_guard() {
        let profile = new_profile_dir().unwrap();
        let path = profile.path().to_path_buf();
        drop(profile);
        assert!(!path.exists());
    }
}
