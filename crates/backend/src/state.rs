//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::BackendConfig;
use crate::permissions::PermissionCache;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackendConfig,
    pool: PgPool,
    permissions: PermissionCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: BackendConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                permissions: PermissionCache::new(),
            }),
        }
    }

    /// Get a reference to the backend configuration.
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the role permission cache.
    #[must_use]
    pub fn permissions(&self) -> &PermissionCache {
        &self.inner.permissions
    }
}
