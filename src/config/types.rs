use serde::Deserialize;

/// Main configuration structure for site-cloner
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
    pub summarizer: SummarizerConfig,
    pub server: ServerConfig,
}

/// Crawl traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page budget used when a request does not name one
    #[serde(rename = "max-pages")]
    pub max_pages: i64,

    /// Overall bound on one page navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Pause after navigation before extraction (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Keep the query string in dedup keys
    #[serde(rename = "query-sensitive")]
    pub query_sensitive: bool,

    /// How the frontier rejects duplicate candidates
    #[serde(rename = "frontier-dedup")]
    pub frontier_dedup: FrontierDedupSetting,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 3,
            navigation_timeout_ms: 30_000,
            settle_delay_ms: 500,
            query_sensitive: false,
            frontier_dedup: FrontierDedupSetting::Normalized,
        }
    }
}

/// Frontier membership check applied when enqueueing links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierDedupSetting {
    /// Compare raw URL strings
    Raw,
    /// Compare normalized keys
    Normalized,
}

/// Which rendering backend to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// Headless Chrome over the DevTools protocol
    Chrome,
    /// Plain HTTP fetch with static HTML parsing (no screenshots)
    Http,
}

/// Render session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub backend: RenderBackend,

    /// Bound on waiting for network quiescence after load (milliseconds)
    #[serde(rename = "network-idle-timeout-ms")]
    pub network_idle_timeout_ms: u64,

    /// User agent sent by the session
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Extra command-line arguments for the Chrome process
    #[serde(rename = "chrome-args")]
    pub chrome_args: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: RenderBackend::Chrome,
            network_idle_timeout_ms: 10_000,
            user_agent: format!("site-cloner/{}", env!("CARGO_PKG_VERSION")),
            chrome_args: vec!["--no-sandbox".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding screenshots and assembled clones
    #[serde(rename = "output-dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "./output".to_string(),
        }
    }
}

/// Summarization service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub enabled: bool,

    /// Inference endpoint receiving `{"inputs": ...}`
    pub endpoint: String,

    /// Name of the environment variable holding the bearer credential
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Input is truncated to this many characters before sending
    #[serde(rename = "max-input-chars")]
    pub max_input_chars: usize,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
                .to_string(),
            api_key_env: "HF_API_KEY".to_string(),
            max_input_chars: 8000,
            timeout_secs: 30,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}
