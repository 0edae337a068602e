//! Render capability: the session a crawl drives page by page
//!
//! A [`Renderer`] is one open browsing session. It navigates to a URL and
//! then answers questions about the page it landed on: full HTML, visible
//! text, outgoing hyperlinks, and a screenshot. The crawl engine borrows a
//! session for its whole traversal but never creates or closes one; that is
//! the caller's job (see [`crate::pipeline`]).
//!
//! Two backends are provided:
//! - [`ChromeRenderer`] drives headless Chrome over the DevTools protocol
//! - [`HttpRenderer`] fetches pages with a plain HTTP client and parses the
//!   static HTML; it cannot take screenshots

mod chrome;
mod http;

pub use chrome::ChromeRenderer;
pub use http::{build_http_client, extract_hrefs, extract_visible_text, HttpRenderer};

use crate::config::{RenderBackend, RenderConfig};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors raised by a render session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch render session: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("No page is loaded in this session")]
    NoPage,

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Not supported by this render backend: {0}")]
    Unsupported(&'static str),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for RenderError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        RenderError::Browser(err.to_string())
    }
}

/// One open rendering session
///
/// All operations after [`Renderer::navigate`] refer to the page most
/// recently navigated to.
#[async_trait]
pub trait Renderer: Send {
    /// Loads `url`, waiting a bounded time for the network to go quiet
    async fn navigate(&mut self, url: &str) -> Result<(), RenderError>;

    /// The URL the session actually landed on, after redirects
    async fn current_url(&mut self) -> Result<Option<String>, RenderError>;

    /// Serialized HTML of the loaded document
    async fn full_html(&mut self) -> Result<String, RenderError>;

    /// Visible text of the first element matching `selector`
    async fn visible_text(&mut self, selector: &str) -> Result<String, RenderError>;

    /// Writes a full-page PNG screenshot to `path`
    async fn capture_screenshot(&mut self, path: &Path) -> Result<(), RenderError>;

    /// Raw `href` values of every element matching `selector`
    async fn extract_links(&mut self, selector: &str) -> Result<Vec<String>, RenderError>;

    /// Releases the session; safe to call more than once
    async fn close(&mut self) -> Result<(), RenderError>;
}

/// Opens a new render session using the configured backend
///
/// A failure here is fatal for the clone request that asked for it.
pub async fn launch(config: &RenderConfig) -> Result<Box<dyn Renderer>, RenderError> {
    match config.backend {
        RenderBackend::Chrome => {
            tracing::debug!("Launching headless Chrome session");
            Ok(Box::new(ChromeRenderer::launch(config).await?))
        }
        RenderBackend::Http => {
            tracing::debug!("Opening plain HTTP render session");
            Ok(Box::new(HttpRenderer::new(config)?))
        }
    }
}
