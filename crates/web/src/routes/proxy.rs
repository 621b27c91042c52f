//! Reverse proxy for `/api` and `/uploads`.
//!
//! Lets the browser talk to the backend through the frontend origin. Method,
//! path, query, body and end-to-end headers are forwarded unchanged.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, Uri},
    response::Response,
};

use url::Url;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest request body forwarded to the backend.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-level headers that must not be forwarded (RFC 9110 7.6.1).
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
    )
}

/// Copy end-to-end headers.
fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Backend URL for an incoming request.
///
/// The path is appended to the base URL's path as is. Dot segments (also
/// percent-encoded ones) are rejected since URL parsing would collapse them.
fn target_url(base: &Url, uri: &Uri) -> Result<Url> {
    let path = uri.path();
    if has_dot_segment(path) {
        return Err(AppError::BadRequest(format!("invalid proxy path: {path}")));
    }

    let mut target = base.clone();
    let prefix = base.path().trim_end_matches('/');
    target.set_path(&format!("{prefix}{path}"));
    target.set_query(uri.query());
    Ok(target)
}

fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}

/// Forward a request to the backend and relay its response.
#[tracing::instrument(skip_all, fields(method = %request.method(), uri = %request.uri()))]
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response> {
    let target = target_url(&state.config().api_url, request.uri())?;

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("request body: {e}")))?;

    let upstream = state
        .http()
        .request(parts.method, target)
        .headers(forwardable(&parts.headers))
        .body(body)
        .send()
        .await?;

    let mut response = Response::builder().status(upstream.status());
    if let Some(headers) = response.headers_mut() {
        *headers = forwardable(upstream.headers());
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::Internal(format!("failed to build response: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, header};

    use super::*;

    #[test]
    fn test_hop_by_hop_headers_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost:5173"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(header::ACCEPT, HeaderValue::from_static("application/json"));

        let out = forwardable(&headers);
        assert!(out.get(header::CONNECTION).is_none());
        assert!(out.get(header::HOST).is_none());
        assert!(out.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(out.get_all(header::ACCEPT).iter().count(), 2);
    }

    fn target(base: &str, uri: &str) -> Result<Url> {
        target_url(&base.parse().unwrap(), &uri.parse().unwrap())
    }

    #[test]
    fn test_target_keeps_path_and_query() {
        let url = target("http://localhost:1337", "/api/home?populate=%2A").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1337/api/home?populate=%2A");
    }

    #[test]
    fn test_target_keeps_base_path_prefix() {
        let url = target("https://example.com/cms/", "/uploads/a.png").unwrap();
        assert_eq!(url.as_str(), "https://example.com/cms/uploads/a.png");

        let url = target("https://example.com/cms", "/api/home").unwrap();
        assert_eq!(url.as_str(), "https://example.com/cms/api/home");
    }

    #[test]
    fn test_target_rejects_dot_segments() {
        assert!(target("http://localhost:1337", "/api/../health").is_err());
        assert!(target("http://localhost:1337", "/api/%2E%2e/health").is_err());
        assert!(target("http://localhost:1337", "/uploads/./a.png").is_err());
        assert!(target("http://localhost:1337", "/uploads/v1.2/a..b.png").is_ok());
    }
}
