//! Role kinds.
//!
//! The CMS has two unrelated role families: admin-panel roles (who may edit
//! content) and end-user roles (which REST actions an API caller may use).

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a role type string is not recognized.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role type: {0}")]
pub struct RoleTypeError(String);

/// End-user role type.
///
/// Anonymous API callers are evaluated against the `public` role, callers with
/// a valid bearer token against the `authenticated` role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    Public,
    Authenticated,
}

impl RoleType {
    /// Database and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleType {
    type Err = RoleTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "authenticated" => Ok(Self::Authenticated),
            other => Err(RoleTypeError(other.to_owned())),
        }
    }
}

/// Admin panel role codes seeded by the initial migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminRoleCode {
    /// Highest privilege; the bootstrap admin gets this role.
    #[serde(rename = "super-admin")]
    SuperAdmin,
    #[serde(rename = "editor")]
    Editor,
    #[serde(rename = "author")]
    Author,
}

impl AdminRoleCode {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Editor => "editor",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for AdminRoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
