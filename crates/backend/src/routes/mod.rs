//! REST route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/home                 - Home singleton (permission: api::home.home.find)
//! PUT    /api/home                 - Update or create the singleton (bearer token)
//! DELETE /api/home                 - Delete the singleton (bearer token)
//! POST   /api/auth/local           - Login with identifier + password
//! POST   /api/auth/local/register  - Register a new user
//! GET    /health                   - Liveness
//! GET    /health/ready             - Readiness (database ping)
//! GET    /uploads/*                - Uploaded media files
//! ```

pub mod auth;
pub mod home;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/home",
            get(home::find).put(home::update).delete(home::delete),
        )
        .route("/auth/local", post(auth::login))
        .route("/auth/local/register", post(auth::register))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
