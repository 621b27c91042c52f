//! End-user role and permission models.

use chrono::{DateTime, Utc};

use cms_starter_core::{PermissionAction, PermissionId, RoleId, RoleType};

/// An end-user role (`public` or `authenticated`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub role_type: RoleType,
    /// Bumped whenever the role's permissions change; permission caches are
    /// keyed by it.
    pub updated_at: DateTime<Utc>,
}

/// A permission row: one action granted (or not) to one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: PermissionId,
    pub action: PermissionAction,
    pub role_id: RoleId,
    pub enabled: bool,
}
