//! Request handlers and wire types for the HTTP API

use crate::config::Config;
use crate::pipeline::clone_site;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Body of `POST /api/clone`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub url: Option<String>,
    pub max_pages: Option<i64>,
}

impl CloneRequest {
    /// Requested page budget; absent or zero means `default`
    pub fn page_budget(&self, default: i64) -> i64 {
        match self.max_pages {
            None | Some(0) => default,
            Some(n) => n,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneResponse {
    pub success: bool,
    pub message: String,
    pub preview_url: String,
    pub summary: String,
    pub details: CloneDetails,
}

#[derive(Debug, Serialize)]
pub struct CloneDetails {
    pub pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    ErrorResponse {
        success: false,
        error: error.into(),
    }
    .into_response_with(status)
}

/// `GET /api/health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// `POST /api/clone`
///
/// A body that is missing or not valid JSON is treated like one without a
/// URL.
pub async fn clone(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<CloneRequest>>,
) -> Response {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let Some(url) = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    else {
        return error_response(StatusCode::BAD_REQUEST, "URL is required");
    };

    let max_pages = request.page_budget(state.config.crawler.max_pages);
    tracing::info!("Clone requested for {} (max pages: {})", url, max_pages);

    match clone_site(&state.config, url, max_pages).await {
        Ok(outcome) => {
            let preview_url = preview_url(&headers, &state.config, &outcome.site.site_dir_name);
            Json(CloneResponse {
                success: true,
                message: "Cloned successfully".to_string(),
                preview_url,
                summary: outcome.summary.clone(),
                details: CloneDetails {
                    pages: outcome.pages(),
                },
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!("Clone of {} failed: {}", url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Absolute URL of a clone's gallery as seen by the requesting client
pub fn preview_url(headers: &HeaderMap, config: &Config, site_dir_name: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(config.server.bind.as_str());

    format!(
        "{}://{}/preview/{}/index.html",
        scheme, host, site_dir_name
    )
}
