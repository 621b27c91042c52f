//! Role permission checks with an in-memory cache.
//!
//! Enabled actions are cached per `(role id, role updated_at)`. Anything that
//! changes a role's permissions bumps `updated_at`, so the next check misses
//! the cache and reloads from the database. Stale entries age out via TTL.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use cms_starter_core::{PermissionAction, RoleId, RoleType};

use crate::db::{RepositoryError, RoleRepository};

/// Cache of enabled actions per role version.
#[derive(Clone)]
pub struct PermissionCache {
    cache: Cache<(RoleId, DateTime<Utc>), Arc<HashSet<String>>>,
}

impl Default for PermissionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionCache {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(600))
            .build();
        Self { cache }
    }

    /// Whether the role of `role_type` may perform `action`.
    ///
    /// A missing role grants nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the role or its permissions cannot be
    /// loaded.
    pub async fn allows(
        &self,
        pool: &PgPool,
        role_type: RoleType,
        action: &PermissionAction,
    ) -> Result<bool, RepositoryError> {
        let roles = RoleRepository::new(pool);
        let Some(role) = roles.find_by_type(role_type).await? else {
            return Ok(false);
        };

        let actions = if let Some(actions) = self.cached(role.id, role.updated_at).await {
            actions
        } else {
            debug!(role = %role_type, "Permission cache miss");
            let actions: HashSet<String> = roles.enabled_actions(role.id).await?.into_iter().collect();
            self.store(role.id, role.updated_at, actions).await
        };

        Ok(actions.contains(action.as_str()))
    }

    /// Cached permission set for a role version, if present.
    pub async fn cached(
        &self,
        role_id: RoleId,
        updated_at: DateTime<Utc>,
    ) -> Option<Arc<HashSet<String>>> {
        self.cache.get(&(role_id, updated_at)).await
    }

    /// Store a permission set for a role version.
    pub async fn store(
        &self,
        role_id: RoleId,
        updated_at: DateTime<Utc>,
        actions: HashSet<String>,
    ) -> Arc<HashSet<String>> {
        let actions = Arc::new(actions);
        self.cache
            .insert((role_id, updated_at), Arc::clone(&actions))
            .await;
        actions
    }
}
