//! End-user snapshot returned by the auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered API user, as returned in `{ jwt, user }` responses and cached
/// by clients alongside the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Attributes added by backend customizations are kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_provider() -> String {
    "local".to_owned()
}
