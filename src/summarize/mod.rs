//! Text summarization through a hosted inference endpoint
//!
//! The summarizer never fails: any problem with the credential, the network
//! or the response yields [`FALLBACK_SUMMARY`].

use crate::config::SummarizerConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Returned whenever no summary could be produced
pub const FALLBACK_SUMMARY: &str = "Summary unavailable.";

/// Why a summarization attempt fell back
#[derive(Debug, Error)]
enum SummarizeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response: {0}")]
    Shape(String),
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: Option<String>,
}

/// Client for a summarization model endpoint
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    max_input_chars: usize,
}

impl Summarizer {
    /// Builds a summarizer, reading the credential from the configured
    /// environment variable; an unset or empty variable means no credential
    pub fn new(config: &SummarizerConfig) -> Result<Self, reqwest::Error> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            max_input_chars: config.max_input_chars,
        })
    }

    /// Replaces the credential picked up from the environment
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Summarizes `text`, truncated to the configured number of characters
    pub async fn summarize(&self, text: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::info!("No summarizer credential configured, skipping summary");
            return FALLBACK_SUMMARY.to_string();
        };

        if text.trim().is_empty() {
            tracing::info!("No page text captured, skipping summary");
            return FALLBACK_SUMMARY.to_string();
        }

        let input = truncate_chars(text, self.max_input_chars);
        match self.request(api_key, input).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Summarization failed: {}", e);
                FALLBACK_SUMMARY.to_string()
            }
        }
    }

    async fn request(&self, api_key: &str, input: &str) -> Result<String, SummarizeError> {
        tracing::debug!(
            "Requesting summary of {} characters from {}",
            input.chars().count(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&serde_json::json!({ "inputs": input }))
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SummarizeError::Status { status, body: raw });
        }

        parse_summary(&raw)
    }
}

/// Summarizes `text` as `config` describes, falling back when summarization
/// is disabled or the client cannot be built
pub async fn summarize_text(config: &SummarizerConfig, text: &str) -> String {
    if !config.enabled {
        tracing::info!("Summarization disabled");
        return FALLBACK_SUMMARY.to_string();
    }

    match Summarizer::new(config) {
        Ok(summarizer) => summarizer.summarize(text).await,
        Err(e) => {
            tracing::warn!("Failed to build summarizer client: {}", e);
            FALLBACK_SUMMARY.to_string()
        }
    }
}

/// Pulls `summary_text` out of the first element of the response array
fn parse_summary(raw: &str) -> Result<String, SummarizeError> {
    let items: Vec<SummaryItem> =
        serde_json::from_str(raw).map_err(|e| SummarizeError::Shape(e.to_string()))?;

    items
        .into_iter()
        .next()
        .and_then(|item| item.summary_text)
        .filter(|summary| !summary.is_empty())
        .ok_or_else(|| SummarizeError::Shape("missing summary_text".to_string()))
}

/// Returns at most `max_chars` characters of `text`
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
