//! Start-up bootstrap routine.
//!
//! Runs after migrations on every backend start:
//!
//! 1. [`ensure_default_admin`] creates the first administrator from
//!    `CMS_ADMIN_*` configuration when no administrator exists.
//! 2. [`enable_public_home_access`] grants the `public` role
//!    `api::home.home.find` and touches the role so cached permission sets
//!    are rebuilt.
//! 3. [`seed_home`] inserts sample home content when none exists.
//!
//! Every step is idempotent. Failures are logged and reported in the
//! returned [`BootstrapReport`]; they never abort start-up.

mod store;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use thiserror::Error;

use cms_starter_core::{
    AdminRoleCode, AdminRoleId, AdminUserId, Email, HomeContent, HomeInput,
    PermissionAction, PermissionId, RoleType,
};

use crate::config::AdminBootstrapConfig;
use crate::db::RepositoryError;
use crate::models::{NewAdmin, Permission, Role};
use crate::services::auth::{AuthError, hash_password};

pub use store::PgStore;

/// Persistence operations the bootstrap routine needs.
pub trait BootstrapStore: Sync {
    fn count_admins(&self) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    fn find_admin_role(
        &self,
        code: AdminRoleCode,
    ) -> impl Future<Output = Result<Option<AdminRoleId>, RepositoryError>> + Send;

    fn create_admin(
        &self,
        admin: &NewAdmin,
    ) -> impl Future<Output = Result<AdminUserId, RepositoryError>> + Send;

    fn find_role(
        &self,
        role_type: RoleType,
    ) -> impl Future<Output = Result<Option<Role>, RepositoryError>> + Send;

    /// Permissions of `role` whose action starts with `prefix`.
    fn find_permissions(
        &self,
        role: &Role,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<Permission>, RepositoryError>> + Send;

    fn enable_permission(
        &self,
        id: PermissionId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn create_permission(
        &self,
        role: &Role,
        action: &PermissionAction,
    ) -> impl Future<Output = Result<PermissionId, RepositoryError>> + Send;

    /// Bump the role's `updated_at`.
    fn touch_role(&self, role: &Role) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn find_home(&self) -> impl Future<Output = Result<Option<HomeContent>, RepositoryError>> + Send;

    fn create_home(
        &self,
        input: &HomeInput,
        published_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<HomeContent, RepositoryError>> + Send;
}

/// Internal step failures, reported as `Failed` outcomes.
#[derive(Debug, Error)]
enum BootstrapError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to hash admin password: {0}")]
    Hash(#[from] AuthError),
    #[error("admin role {0} does not exist")]
    MissingAdminRole(AdminRoleCode),
}

/// Result of [`ensure_default_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Created(AdminUserId),
    AlreadyPresent,
    MissingCredentials,
    Failed,
}

/// Result of [`enable_public_home_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// Existing disabled permission was switched on.
    Enabled,
    AlreadyEnabled,
    /// Permission did not exist and was created enabled.
    Created,
    RoleMissing,
    Failed,
}

/// Result of [`seed_home`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadyPresent,
    Failed,
}

/// Outcomes of a full bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub admin: AdminOutcome,
    pub permission: PermissionOutcome,
    pub seed: SeedOutcome,
}

/// Run all bootstrap steps in order.
pub async fn run<S: BootstrapStore>(store: &S, admin: &AdminBootstrapConfig) -> BootstrapReport {
    let admin = ensure_default_admin(store, admin).await;
    let permission = enable_public_home_access(store).await;
    let seed = seed_home(store).await;

    tracing::info!(?admin, ?permission, ?seed, "Bootstrap complete");

    BootstrapReport {
        admin,
        permission,
        seed,
    }
}

/// Create the default administrator if none exists.
pub async fn ensure_default_admin<S: BootstrapStore>(
    store: &S,
    config: &AdminBootstrapConfig,
) -> AdminOutcome {
    match try_create_admin(store, config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create default admin");
            AdminOutcome::Failed
        }
    }
}

async fn try_create_admin<S: BootstrapStore>(
    store: &S,
    config: &AdminBootstrapConfig,
) -> Result<AdminOutcome, BootstrapError> {
    if store.count_admins().await? > 0 {
        tracing::debug!("Administrator already exists, skipping creation");
        return Ok(AdminOutcome::AlreadyPresent);
    }

    let Some((email, password)) = config.credentials() else {
        tracing::info!("CMS_ADMIN_EMAIL/CMS_ADMIN_PASSWORD not set, skipping admin creation");
        return Ok(AdminOutcome::MissingCredentials);
    };

    // Addresses that do not parse are stored as supplied.
    let email = Email::parse(email).map_or_else(|_| email.trim().to_owned(), Email::into_inner);

    let role_id = store
        .find_admin_role(AdminRoleCode::SuperAdmin)
        .await?
        .ok_or(BootstrapError::MissingAdminRole(AdminRoleCode::SuperAdmin))?;

    let admin = NewAdmin {
        email,
        password_hash: hash_password(password.expose_secret())?,
        firstname: config.firstname.clone(),
        lastname: config.lastname.clone(),
        is_active: true,
        role_id,
    };

    let id = store.create_admin(&admin).await?;
    tracing::info!(admin_id = %id, email = %admin.email, "Default admin created");
    Ok(AdminOutcome::Created(id))
}

/// Give anonymous callers read access to the home singleton.
pub async fn enable_public_home_access<S: BootstrapStore>(store: &S) -> PermissionOutcome {
    match try_enable_public_home_access(store).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Failed to enable public home access");
            PermissionOutcome::Failed
        }
    }
}

async fn try_enable_public_home_access<S: BootstrapStore>(
    store: &S,
) -> Result<PermissionOutcome, BootstrapError> {
    let Some(role) = store.find_role(RoleType::Public).await? else {
        tracing::error!("Public role not found");
        return Ok(PermissionOutcome::RoleMissing);
    };

    let action = PermissionAction::home_find();
    let prefix = PermissionAction::content_type_prefix(HomeContent::UID);
    let existing = store
        .find_permissions(&role, &prefix)
        .await?
        .into_iter()
        .find(|p| p.action == action);

    let outcome = match existing {
        Some(permission) if permission.enabled => PermissionOutcome::AlreadyEnabled,
        Some(permission) => {
            store.enable_permission(permission.id).await?;
            PermissionOutcome::Enabled
        }
        None => {
            store.create_permission(&role, &action).await?;
            PermissionOutcome::Created
        }
    };

    store.touch_role(&role).await?;
    tracing::info!(action = %action, role = %role.name, ?outcome, "Public home access enabled");
    Ok(outcome)
}

/// Insert sample home content if the singleton is empty.
pub async fn seed_home<S: BootstrapStore>(store: &S) -> SeedOutcome {
    let result = async {
        if store.find_home().await?.is_some() {
            return Ok(SeedOutcome::AlreadyPresent);
        }
        let home = store.create_home(&HomeInput::sample(), Utc::now()).await?;
        tracing::info!(home_id = %home.id, "Home content seeded");
        Ok::<_, RepositoryError>(SeedOutcome::Seeded)
    }
    .await;

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to seed home content");
        SeedOutcome::Failed
    })
}
