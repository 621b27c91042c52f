//! `PostgreSQL` implementation of [`BootstrapStore`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cms_starter_core::{
    AdminRoleCode, AdminRoleId, AdminUserId, HomeContent, HomeInput, PermissionAction,
    PermissionId, RoleType,
};

use super::BootstrapStore;
use crate::db::{AdminUserRepository, HomeRepository, RepositoryError, RoleRepository};
use crate::models::{NewAdmin, Permission, Role};

/// Bootstrap store backed by the repositories.
pub struct PgStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgStore<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl BootstrapStore for PgStore<'_> {
    async fn count_admins(&self) -> Result<i64, RepositoryError> {
        AdminUserRepository::new(self.pool).count().await
    }

    async fn find_admin_role(
        &self,
        code: AdminRoleCode,
    ) -> Result<Option<AdminRoleId>, RepositoryError> {
        AdminUserRepository::new(self.pool).find_role(code).await
    }

    async fn create_admin(&self, admin: &NewAdmin) -> Result<AdminUserId, RepositoryError> {
        AdminUserRepository::new(self.pool).create(admin).await
    }

    async fn find_role(&self, role_type: RoleType) -> Result<Option<Role>, RepositoryError> {
        RoleRepository::new(self.pool).find_by_type(role_type).await
    }

    async fn find_permissions(
        &self,
        role: &Role,
        prefix: &str,
    ) -> Result<Vec<Permission>, RepositoryError> {
        RoleRepository::new(self.pool)
            .permissions_with_prefix(role.id, prefix)
            .await
    }

    async fn enable_permission(&self, id: PermissionId) -> Result<(), RepositoryError> {
        RoleRepository::new(self.pool).enable_permission(id).await
    }

    async fn create_permission(
        &self,
        role: &Role,
        action: &PermissionAction,
    ) -> Result<PermissionId, RepositoryError> {
        RoleRepository::new(self.pool)
            .create_permission(role.id, action, true)
            .await
    }

    async fn touch_role(&self, role: &Role) -> Result<(), RepositoryError> {
        RoleRepository::new(self.pool).touch(role.id).await
    }

    async fn find_home(&self) -> Result<Option<HomeContent>, RepositoryError> {
        HomeRepository::new(self.pool).find().await
    }

    async fn create_home(
        &self,
        input: &HomeInput,
        published_at: DateTime<Utc>,
    ) -> Result<HomeContent, RepositoryError> {
        HomeRepository::new(self.pool)
            .create(input, Some(published_at))
            .await
    }
}
