//! HTTP API server
//!
//! Axum-based front end that clones a site per request and serves the
//! generated clones as static files.
//!
//! Routes:
//! - `GET /api/health`
//! - `POST /api/clone`
//! - `GET /preview/*` files under the configured output directory

mod handlers;

pub use handlers::{
    clone, health, preview_url, AppState, CloneDetails, CloneRequest, CloneResponse,
    ErrorResponse,
};

use crate::config::Config;
use crate::ConfigError;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let previews = ServeDir::new(&state.config.output.output_dir);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/clone", post(clone))
        .nest_service("/preview", previews)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process exits
pub async fn serve(config: Config) -> crate::Result<()> {
    let addr: SocketAddr = config.server.bind.parse().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address {}: {}", config.server.bind, e))
    })?;

    tokio::fs::create_dir_all(&config.output.output_dir).await?;

    let app = router(AppState::new(config));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Backend listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(output_dir: &TempDir) -> Router {
        let mut config = Config::default();
        config.output.output_dir = output_dir.path().display().to_string();
        router(AppState::new(config))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn clone_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/clone")
            .header("content-type", "application/json")
            .header("host", "localhost:5000")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_clone_without_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        for body in [r#"{}"#, r#"{"url":""}"#, r#"{"maxPages":2}"#, "not json"] {
            let response = app(&dir).oneshot(clone_request(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(
                json_body(response).await,
                serde_json::json!({ "success": false, "error": "URL is required" })
            );
        }
    }

    #[tokio::test]
    async fn test_preview_serves_output_dir() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("cloned-1/site");
        std::fs::create_dir_all(&site).unwrap();
        std::fs::write(site.join("index.html"), "<h1>Preview</h1>").unwrap();

        let response = app(&dir)
            .oneshot(
                Request::builder()
                    .uri("/preview/cloned-1/site/index.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<h1>Preview</h1>");
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_serve_rejects_bad_bind_address() {
        let mut config = Config::default();
        config.server.bind = "nowhere".to_string();
        assert!(serve(config).await.is_err());
    }
}
