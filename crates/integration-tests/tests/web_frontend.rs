//! Web frontend against an in-process mock backend.
//!
//! Covers the home page flow (client, resource, templates) and the `/api` and
//! `/uploads` reverse proxy.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
};
use serde_json::{Value, json};

use cms_starter_integration_tests::{home_json, spawn};
use cms_starter_web::{config::WebConfig, state::AppState};

/// Start the web frontend pointed at `api_url`.
async fn spawn_web(api_url: &str, rich_text: &str) -> String {
    let config = WebConfig::from_lookup(|key| match key {
        "CMS_API_URL" => Some(api_url.to_owned()),
        "WEB_RICH_TEXT" => Some(rich_text.to_owned()),
        _ => None,
    })
    .unwrap();
    spawn(cms_starter_web::app(AppState::new(config).unwrap())).await
}

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn home_with_data(
    State(seen): State<Seen>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().push(query);
    Json(json!({ "data": home_json(), "meta": {} }))
}

#[tokio::test]
async fn test_home_fragment_renders_backend_content() {
    let seen: Seen = Arc::default();
    let backend = spawn(
        Router::new()
            .route("/api/home", get(home_with_data))
            .with_state(Arc::clone(&seen)),
    )
    .await;
    let web = spawn_web(&backend, "markdown").await;

    let body = reqwest::get(format!("{web}/fragments/home"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("Welcome to Our Website"));
    assert!(body.contains("Built with a headless CMS and a Rust frontend"));
    assert!(body.contains("<h2>Getting Started</h2>"));
    assert!(!body.contains("alert-warning"));

    let queries = seen.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("populate").map(String::as_str), Some("*"));
}

#[tokio::test]
async fn test_home_fragment_shows_backend_error() {
    let backend = spawn(Router::new().route(
        "/api/home",
        get(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "data": null,
                    "error": { "status": 403, "name": "ForbiddenError", "message": "Forbidden", "details": {} }
                })),
            )
        }),
    ))
    .await;
    let web = spawn_web(&backend, "markdown").await;

    let resp = reqwest::get(format!("{web}/fragments/home")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("alert-warning"));
    assert!(body.contains("Failed to load home page data: Forbidden"));
}

#[tokio::test]
async fn test_home_fragment_without_content() {
    let backend = spawn(Router::new().route(
        "/api/home",
        get(|| async { Json(json!({ "data": null, "meta": {} })) }),
    ))
    .await;
    let web = spawn_web(&backend, "markdown").await;

    let body = reqwest::get(format!("{web}/fragments/home"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("No Content"));
}

#[tokio::test]
async fn test_home_fragment_when_backend_is_down() {
    // Nothing listens on the discard port.
    let web = spawn_web("http://127.0.0.1:9", "markdown").await;

    let body = reqwest::get(format!("{web}/fragments/home"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Failed to load home page data:"));
}

#[tokio::test]
async fn test_default_policy_inserts_stored_markup_unchanged() {
    let backend = spawn(Router::new().route(
        "/api/home",
        get(|| async {
            let mut home = home_json();
            home["content"] = json!(r#"<div class="x">a_b_c</div>"#);
            Json(json!({ "data": home, "meta": {} }))
        }),
    ))
    .await;
    // An empty WEB_RICH_TEXT counts as unset.
    let web = spawn_web(&backend, "").await;

    let body = reqwest::get(format!("{web}/fragments/home"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"<div class="x">a_b_c</div>"#));
}

#[tokio::test]
async fn test_escaped_policy_drops_inline_html() {
    let backend = spawn(Router::new().route(
        "/api/home",
        get(|| async {
            let mut home = home_json();
            home["content"] = json!("<script>alert(1)</script>");
            Json(json!({ "data": home, "meta": {} }))
        }),
    ))
    .await;
    let web = spawn_web(&backend, "escaped").await;

    let body = reqwest::get(format!("{web}/fragments/home"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("<script>"));
    assert!(body.contains("Welcome to Our Website"));
}

#[tokio::test]
async fn test_page_shell_loads_fragment() {
    let web = spawn_web("http://127.0.0.1:9", "markdown").await;

    let body = reqwest::get(format!("{web}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(r#"hx-get="/fragments/home""#));
    assert!(body.contains("skeleton"));
}

async fn echo(
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    (
        StatusCode::CREATED,
        [("x-upstream", "mock")],
        Json(json!({
            "method": method.as_str(),
            "path": path,
            "query": query,
            "authorization": header("authorization"),
            "x_custom": header("x-custom"),
            "body": String::from_utf8_lossy(&body),
        })),
    )
}

#[tokio::test]
async fn test_api_proxy_forwards_request_unchanged() {
    let backend = spawn(Router::new().route("/api/{*path}", any(echo))).await;
    let web = spawn_web(&backend, "markdown").await;

    let resp = reqwest::Client::new()
        .put(format!("{web}/api/articles/3?locale=en"))
        .header("authorization", "Bearer abc")
        .header("x-custom", "kept")
        .body(r#"{"data":{"title":"Hi"}}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers().get("x-upstream").unwrap(), "mock");

    let echoed: Value = resp.json().await.unwrap();
    assert_eq!(echoed["method"], "PUT");
    assert_eq!(echoed["path"], "articles/3");
    assert_eq!(echoed["query"]["locale"], "en");
    assert_eq!(echoed["authorization"], "Bearer abc");
    assert_eq!(echoed["x_custom"], "kept");
    assert_eq!(echoed["body"], r#"{"data":{"title":"Hi"}}"#);
}

#[tokio::test]
async fn test_uploads_proxy_relays_bytes() {
    let backend = spawn(Router::new().route(
        "/uploads/{*path}",
        get(|Path(path): Path<String>| async move { format!("file:{path}") }),
    ))
    .await;
    let web = spawn_web(&backend, "markdown").await;

    let resp = reqwest::get(format!("{web}/uploads/images/hero.png"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "file:images/hero.png");
}

#[tokio::test]
async fn test_proxy_relays_backend_errors() {
    let backend = spawn(Router::new().route(
        "/api/{*path}",
        any(|| async { (StatusCode::NOT_FOUND, Json(json!({ "data": null }))) }),
    ))
    .await;
    let web = spawn_web(&backend, "markdown").await;

    let resp = reqwest::get(format!("{web}/api/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_proxy_returns_bad_gateway_when_backend_is_down() {
    let web = spawn_web("http://127.0.0.1:9", "markdown").await;

    let resp = reqwest::get(format!("{web}/api/home")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}
