//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod auth;
pub mod request_id;

pub use auth::{OptionalUser, RequireUser};
pub use request_id::request_id_middleware;
