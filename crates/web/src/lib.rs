//! CMS Starter web frontend library.
//!
//! Server-rendered pages over the CMS REST API, plus a reverse proxy so the
//! browser can reach `/api` and `/uploads` on the frontend origin.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/web/static";

/// Build the application router (without Sentry layers).
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .merge(routes::proxy_routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::WebConfig;

    fn test_app() -> Router {
        // Nothing listens on the discard port.
        let config = WebConfig::from_lookup(|key| {
            (key == "CMS_API_URL").then(|| "http://127.0.0.1:9".to_owned())
        })
        .unwrap();
        app(AppState::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_proxy_without_backend_is_bad_gateway() {
        let response = test_app()
            .oneshot(Request::get("/api/home").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_proxy_rejects_dot_segments() {
        let response = test_app()
            .oneshot(Request::get("/api/../health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
