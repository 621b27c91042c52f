//! Admin user repository.
//!
//! Admin accounts only ever get created by the bootstrap routine; the admin
//! panel itself is outside this backend.

use sqlx::PgPool;

use cms_starter_core::{AdminRoleCode, AdminRoleId, AdminUserId};

use super::RepositoryError;
use crate::models::NewAdmin;

/// Repository for admin panel accounts and roles.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count all admin accounts, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_user")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Look up an admin role by code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_role(
        &self,
        code: AdminRoleCode,
    ) -> Result<Option<AdminRoleId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, AdminRoleId>("SELECT id FROM admin_role WHERE code = $1")
            .bind(code.as_str())
            .fetch_optional(self.pool)
            .await?;
        Ok(id)
    }

    /// Create an admin account and attach its role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, admin: &NewAdmin) -> Result<AdminUserId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, AdminUserId>(
            r"
            INSERT INTO admin_user (email, password_hash, firstname, lastname, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(admin.email.as_str())
        .bind(&admin.password_hash)
        .bind(&admin.firstname)
        .bind(&admin.lastname)
        .bind(admin.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "admin email"))?;

        sqlx::query("INSERT INTO admin_user_role (user_id, role_id) VALUES ($1, $2)")
            .bind(id)
            .bind(admin.role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(id)
    }
}
