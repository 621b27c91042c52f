//! Integration tests for CMS Starter.
//!
//! # Running Tests
//!
//! ```bash
//! # Cross-crate tests (in-process servers, no external services)
//! cargo test -p cms-starter-integration-tests
//!
//! # Live tests against a running backend with a migrated database
//! CMS_API_URL=http://localhost:1337 \
//!     cargo test -p cms-starter-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `web_frontend` - Web pages and reverse proxy against a mock backend
//! - `backend_api` - REST API, bootstrap results and auth against a live backend

use axum::Router;
use serde_json::{Value, json};

/// Base URL for the live backend (configurable via environment).
#[must_use]
pub fn backend_base_url() -> String {
    std::env::var("CMS_API_URL").unwrap_or_else(|_| "http://localhost:1337".to_owned())
}

/// Serve `app` on an ephemeral local port and return its origin.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[allow(clippy::expect_used)]
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read test listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// A published home record as the backend serializes it.
#[must_use]
pub fn home_json() -> Value {
    json!({
        "id": 1,
        "documentId": "0d8f4f0e-5c1a-4b8e-9d62-3f4a7c2b1e90",
        "welcome_text": "Welcome to Our Website",
        "subtitle": "Built with a headless CMS and a Rust frontend",
        "content": "## Getting Started\n\nEdit this page through the CMS API.",
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z",
        "publishedAt": "2025-01-01T00:00:00Z"
    })
}
