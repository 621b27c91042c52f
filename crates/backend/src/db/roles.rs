//! End-user role and permission repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cms_starter_core::{PermissionAction, PermissionId, RoleId, RoleType};

use super::RepositoryError;
use crate::models::{Permission, Role};

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: RoleId,
    name: String,
    #[sqlx(rename = "type")]
    role_type: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoleRow> for Role {
    type Error = RepositoryError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let role_type = row
            .role_type
            .parse::<RoleType>()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role type: {e}")))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            role_type,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PermissionRow {
    id: PermissionId,
    action: String,
    role_id: RoleId,
    enabled: bool,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = RepositoryError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        let action = PermissionAction::parse(&row.action).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid action {:?}: {e}", row.action))
        })?;
        Ok(Self {
            id: row.id,
            action,
            role_id: row.role_id,
            enabled: row.enabled,
        })
    }
}

/// Repository for `up_role` and `up_permission`.
pub struct RoleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepository<'a> {
    /// Create a new role repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the role of the given type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored type is unknown.
    pub async fn find_by_type(&self, role_type: RoleType) -> Result<Option<Role>, RepositoryError> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT id, name, type, updated_at FROM up_role WHERE type = $1",
        )
        .bind(role_type.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Role::try_from).transpose()
    }

    /// List a role's permissions whose action starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn permissions_with_prefix(
        &self,
        role_id: RoleId,
        prefix: &str,
    ) -> Result<Vec<Permission>, RepositoryError> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r"
            SELECT id, action, role_id, enabled
            FROM up_permission
            WHERE role_id = $1 AND left(action, length($2)) = $2
            ORDER BY id
            ",
        )
        .bind(role_id)
        .bind(prefix)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Permission::try_from).collect()
    }

    /// Actions currently enabled for a role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn enabled_actions(&self, role_id: RoleId) -> Result<Vec<String>, RepositoryError> {
        let actions = sqlx::query_scalar::<_, String>(
            "SELECT action FROM up_permission WHERE role_id = $1 AND enabled",
        )
        .bind(role_id)
        .fetch_all(self.pool)
        .await?;
        Ok(actions)
    }

    /// Mark a permission enabled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no permission has this id.
    pub async fn enable_permission(&self, id: PermissionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE up_permission SET enabled = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Create a permission for a role.
    ///
    /// A concurrent insert of the same `(action, role)` pair is folded into
    /// the existing row rather than failing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_permission(
        &self,
        role_id: RoleId,
        action: &PermissionAction,
        enabled: bool,
    ) -> Result<PermissionId, RepositoryError> {
        let id = sqlx::query_scalar::<_, PermissionId>(
            r"
            INSERT INTO up_permission (action, role_id, enabled)
            VALUES ($1, $2, $3)
            ON CONFLICT (action, role_id)
            DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()
            RETURNING id
            ",
        )
        .bind(action.as_str())
        .bind(role_id)
        .bind(enabled)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Bump a role's `updated_at`, invalidating cached permission sets.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the role does not exist.
    pub async fn touch(&self, role_id: RoleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE up_role SET updated_at = clock_timestamp() WHERE id = $1")
            .bind(role_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
