//! Plain HTTP render backend
//!
//! This backend handles:
//! - Building an HTTP client with the configured user agent
//! - GET requests with redirect following (loops end in an error)
//! - Classifying responses into navigation failures
//! - Extracting visible text and links from the static HTML
//!
//! No JavaScript runs, so pages that build their content client-side come
//! back mostly empty. Screenshots are not supported.

use crate::config::RenderConfig;
use crate::render::{RenderError, Renderer};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::time::Duration;

/// Maximum redirect hops followed before navigation fails
const MAX_REDIRECTS: usize = 10;

/// Elements whose text is never visible
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// The document loaded by the last successful navigation
#[derive(Debug)]
struct LoadedPage {
    final_url: String,
    body: String,
}

/// Render session backed by a plain HTTP client
pub struct HttpRenderer {
    client: Client,
    current: Option<LoadedPage>,
}

/// Builds an HTTP client for the render session
///
/// # Arguments
///
/// * `config` - The render configuration (user agent, idle timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &RenderConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_millis(config.network_idle_timeout_ms).max(Duration::from_secs(1)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

impl HttpRenderer {
    /// Creates a session with no page loaded
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        let client = build_http_client(config).map_err(|e| RenderError::Launch(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Creates a session around an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn page(&self) -> Result<&LoadedPage, RenderError> {
        self.current.as_ref().ok_or(RenderError::NoPage)
    }

    /// Fetches `url` and classifies the response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with HTML body | loaded page |
    /// | Non-2xx status | `HttpStatus` |
    /// | Non-HTML Content-Type | `ContentMismatch` |
    /// | Timeout | `Timeout` |
    /// | Redirect loop, DNS, TLS, refused | `Navigation` |
    async fn fetch(&self, url: &str) -> Result<LoadedPage, RenderError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return Err(RenderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // A missing header is given the benefit of the doubt
        if !content_type.is_empty()
            && !content_type.contains("text/html")
            && !content_type.contains("application/xhtml")
        {
            return Err(RenderError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(LoadedPage { final_url, body })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError> {
        self.current = None;
        let page = self.fetch(url).await?;
        self.current = Some(page);
        Ok(())
    }

    async fn current_url(&mut self) -> Result<Option<String>, RenderError> {
        Ok(self.current.as_ref().map(|p| p.final_url.clone()))
    }

    async fn full_html(&mut self) -> Result<String, RenderError> {
        Ok(self.page()?.body.clone())
    }

    async fn visible_text(&mut self, selector: &str) -> Result<String, RenderError> {
        extract_visible_text(&self.page()?.body, selector)
    }

    async fn capture_screenshot(&mut self, _path: &Path) -> Result<(), RenderError> {
        Err(RenderError::Unsupported("screenshots"))
    }

    async fn extract_links(&mut self, selector: &str) -> Result<Vec<String>, RenderError> {
        extract_hrefs(&self.page()?.body, selector)
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        self.current = None;
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector).map_err(|_| RenderError::Selector(selector.to_string()))
}

/// Extracts the visible text of the first element matching `selector`
///
/// Text inside script, style and similar elements is skipped, and runs of
/// whitespace collapse to a single space. No match yields an empty string.
///
/// # Example
///
/// ```
/// use site_cloner::render::extract_visible_text;
///
/// let html = "<html><body><h1>Hi</h1><script>var x;</script><p>there</p></body></html>";
/// assert_eq!(extract_visible_text(html, "body").unwrap(), "Hi there");
/// ```
pub fn extract_visible_text(html: &str, selector: &str) -> Result<String, RenderError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let mut chunks = Vec::new();
    if let Some(element) = document.select(&selector).next() {
        collect_text(element, &mut chunks);
    }

    Ok(chunks.join(" "))
}

fn collect_text(element: ElementRef<'_>, chunks: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !collapsed.is_empty() {
                chunks.push(collapsed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_TAGS.contains(&child_element.value().name()) {
                collect_text(child_element, chunks);
            }
        }
    }
}

/// Extracts raw `href` values from every element matching `selector`
///
/// Values are returned as written in the document; resolving them is the
/// crawler's job. Empty hrefs and `download` links are skipped.
pub fn extract_hrefs(html: &str, selector: &str) -> Result<Vec<String>, RenderError> {
    let selector = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let links = document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    Ok(links)
}
