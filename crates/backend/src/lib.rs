//! CMS Starter backend library.
//!
//! Headless CMS backend: Postgres repositories, the start-up bootstrap
//! routine, role permission checks and the REST API consumed by the web
//! frontend and the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Directory served under `/uploads`.
pub const UPLOADS_DIR: &str = "public/uploads";

/// Build the application router (without Sentry layers).
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::api_routes())
        .nest_service("/uploads", ServeDir::new(UPLOADS_DIR))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
