//! Integration tests for the cloner
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! crawl, assemble and serve cycle through the plain HTTP render backend.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use site_cloner::config::{Config, RenderBackend, RenderConfig};
use site_cloner::crawler::{crawl, CrawlOptions};
use site_cloner::pipeline::clone_site;
use site_cloner::render::{HttpRenderer, Renderer};
use site_cloner::server::{router, AppState};
use site_cloner::summarize::FALLBACK_SUMMARY;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>t</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a small site: home links to about (twice, in equivalent forms),
/// a missing page, and another origin
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<h1>Home page</h1>
               <a href="/about">About</a>
               <a href="/about/">About again</a>
               <a href="/missing">Missing</a>
               <a href="https://other.invalid/">Elsewhere</a>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(r#"<p>About us</p><a href="/">Home</a><a href="contact">Contact</a>"#))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<p>Write to us</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn crawl_options(dir: &TempDir) -> CrawlOptions {
    CrawlOptions {
        navigation_timeout: Duration::from_secs(5),
        settle_delay: Duration::ZERO,
        screenshot_dir: dir.path().to_path_buf(),
        ..CrawlOptions::default()
    }
}

fn renderer() -> HttpRenderer {
    let config = RenderConfig {
        backend: RenderBackend::Http,
        ..RenderConfig::default()
    };
    HttpRenderer::new(&config).unwrap()
}

fn test_config(output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.render.backend = RenderBackend::Http;
    config.crawler.settle_delay_ms = 0;
    config.crawler.navigation_timeout_ms = 5000;
    config.output.output_dir = output_dir.path().display().to_string();
    config.summarizer.enabled = false;
    config
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_crawl_follows_same_origin_links_within_budget() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let shots = TempDir::new().unwrap();

    let start = format!("{}/", server.uri());
    let mut session = renderer();
    let result = crawl(&mut session, &start, 2, &crawl_options(&shots)).await;
    session.close().await.unwrap();

    let urls: Vec<&str> = result.records.iter().map(|r| r.url()).collect();
    assert_eq!(urls, vec![start.clone(), format!("{}/about", server.uri())]);
    assert_eq!(result.start_url, start);
    assert!(result.records[0].text().contains("Home page"));
    assert!(result.records[1].html().contains("About us"));

    // Budget reached before the frontier drained
    assert_eq!(requested_paths(&server).await, vec!["/", "/about"]);
}

#[tokio::test]
async fn test_crawl_skips_failed_pages_and_drains_frontier() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let shots = TempDir::new().unwrap();

    let start = format!("{}/", server.uri());
    let mut session = renderer();
    let result = crawl(&mut session, &start, 10, &crawl_options(&shots)).await;

    let urls: Vec<String> = result.records.iter().map(|r| r.url().to_string()).collect();
    assert_eq!(
        urls,
        vec![
            start,
            format!("{}/about", server.uri()),
            format!("{}/contact", server.uri()),
        ]
    );

    let paths = requested_paths(&server).await;
    assert_eq!(paths, vec!["/", "/about", "/missing", "/contact"]);
}

#[tokio::test]
async fn test_crawl_with_failing_start_url_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let shots = TempDir::new().unwrap();

    let mut session = renderer();
    let result = crawl(&mut session, &server.uri(), 3, &crawl_options(&shots)).await;

    assert!(result.records.is_empty());
    assert_eq!(requested_paths(&server).await.len(), 1);
}

#[tokio::test]
async fn test_crawl_with_zero_budget_makes_no_requests() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let shots = TempDir::new().unwrap();

    let mut session = renderer();
    for budget in [0, -1] {
        let result = crawl(&mut session, &server.uri(), budget, &crawl_options(&shots)).await;
        assert!(result.records.is_empty());
    }

    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_clone_site_assembles_preview() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let output = TempDir::new().unwrap();

    let outcome = clone_site(&test_config(&output), &format!("{}/", server.uri()), 3)
        .await
        .unwrap();

    assert_eq!(outcome.pages(), 3);
    assert_eq!(outcome.summary, FALLBACK_SUMMARY);

    let site_dir = output.path().join(&outcome.site.site_dir_name);
    assert!(site_dir.join("index.html").is_file());
    for page in ["page-1.html", "page-2.html", "page-3.html"] {
        assert!(site_dir.join(page).is_file(), "{} missing", page);
    }
    // The HTTP backend takes no screenshots
    assert!(!site_dir.join("screenshot-1.png").exists());

    let index = std::fs::read_to_string(site_dir.join("index.html")).unwrap();
    assert!(index.contains(&format!("{}/about", server.uri())));
}

#[tokio::test]
async fn test_clone_site_with_negative_budget_still_assembles() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let output = TempDir::new().unwrap();

    let outcome = clone_site(&test_config(&output), &server.uri(), -3)
        .await
        .unwrap();

    assert_eq!(outcome.pages(), 0);
    assert!(output
        .path()
        .join(&outcome.site.preview_relative_path)
        .is_file());
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_clone_site_summarizes_page_text() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "summary_text": "A small site." }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let output = TempDir::new().unwrap();

    let key_var = "SITE_CLONER_INTEGRATION_SUMMARY_KEY";
    std::env::set_var(key_var, "test-token");

    let mut config = test_config(&output);
    config.summarizer.enabled = true;
    config.summarizer.endpoint = format!("{}/summarize", server.uri());
    config.summarizer.api_key_env = key_var.to_string();

    let outcome = clone_site(&config, &format!("{}/", server.uri()), 1)
        .await
        .unwrap();

    assert_eq!(outcome.pages(), 1);
    assert_eq!(outcome.summary, "A small site.");
}

#[tokio::test]
async fn test_api_clone_returns_preview_url() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let output = TempDir::new().unwrap();
    let app = router(AppState::new(test_config(&output)));

    let body = serde_json::json!({ "url": format!("{}/", server.uri()), "maxPages": 2 });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/clone")
                .header("content-type", "application/json")
                .header("host", "localhost:5000")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Cloned successfully");
    assert_eq!(json["details"]["pages"], 2);
    assert_eq!(json["summary"], FALLBACK_SUMMARY);

    let preview_url = json["previewUrl"].as_str().unwrap();
    let preview_path = preview_url
        .strip_prefix("http://localhost:5000")
        .expect("preview URL uses the request host");
    assert!(preview_path.starts_with("/preview/cloned-"));
    assert!(preview_path.ends_with("/site/index.html"));

    let response = app
        .oneshot(Request::builder().uri(preview_path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("Generated Clone Preview"));
}

#[tokio::test]
async fn test_api_clone_without_max_pages_uses_configured_budget() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let output = TempDir::new().unwrap();

    let mut config = test_config(&output);
    config.crawler.max_pages = 1;
    let app = router(AppState::new(config));

    let body = serde_json::json!({ "url": format!("{}/", server.uri()) });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/clone")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["details"]["pages"], 1);
    assert_eq!(requested_paths(&server).await, vec!["/"]);
}
