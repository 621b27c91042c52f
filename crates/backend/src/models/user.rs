//! End-user models.

use chrono::{DateTime, Utc};

use cms_starter_core::{Email, RoleId, User, UserId};

/// An `up_user` row without its password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub provider: String,
    pub confirmed: bool,
    pub blocked: bool,
    pub role_id: Option<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email.into_inner(),
            provider: record.provider,
            confirmed: record.confirmed,
            blocked: record.blocked,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
            extra: serde_json::Map::new(),
        }
    }
}
