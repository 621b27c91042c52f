//! HTTP route handlers for the web frontend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page shell (loads the fragment via HTMX)
//! GET  /fragments/home   - Home content fragment (HTMX)
//! GET  /health           - Health check
//! ANY  /api/*            - Forwarded to the backend
//! ANY  /uploads/*        - Forwarded to the backend
//! ```

pub mod home;
pub mod proxy;

use axum::{
    Router,
    routing::{any, get},
};

use crate::state::AppState;

/// Create the page routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::page))
        .route("/fragments/home", get(home::fragment))
        .route("/health", get(health))
}

/// Create the reverse proxy router.
pub fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api", any(proxy::forward))
        .route("/api/{*path}", any(proxy::forward))
        .route("/uploads/{*path}", any(proxy::forward))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
