//! REST envelope and auth payload types.
//!
//! ```text
//! GET  /api/<resource>             -> { "data": ..., "meta": {...} }
//! PUT  /api/<resource>             <- { "data": {...} }
//! POST /api/auth/local             <- { "identifier", "password" }   -> { "jwt", "user" }
//! POST /api/auth/local/register    <- { "username", "email", "password" } -> { "jwt", "user" }
//! any failure                      -> { "data": null, "error": { "status", "name", "message" } }
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::User;

/// Response envelope for content endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Meta,
}

impl<T> Envelope<T> {
    /// Wrap `data` with empty metadata.
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Meta::default(),
        }
    }
}

/// Envelope metadata. Collections carry pagination; singletons carry nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Page-based pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

/// Request body for write operations (`{ "data": ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPayload<T> {
    pub data: T,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub data: Option<serde_json::Value>,
    pub error: ApiErrorDetail,
}

/// Error detail inside [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    /// Error class, e.g. `ValidationError`, `ForbiddenError`.
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl ApiErrorBody {
    /// Build an error body with empty details.
    #[must_use]
    pub fn new(status: u16, name: &str, message: &str) -> Self {
        Self {
            data: None,
            error: ApiErrorDetail {
                status,
                name: name.to_owned(),
                message: message.to_owned(),
                details: serde_json::Value::Object(serde_json::Map::new()),
            },
        }
    }
}

/// Successful login/register response.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token (named `jwt` on the wire for compatibility).
    pub jwt: String,
    pub user: User,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("jwt", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// `POST /api/auth/local` body.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    pub identifier: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `POST /api/auth/local/register` body.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
