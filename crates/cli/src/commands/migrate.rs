//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cms-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CMS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/backend/migrations/`. The backend also applies
//! them on start-up; this command exists for deploy pipelines that migrate
//! before rolling out.

use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply pending CMS migrations.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = std::env::var("CMS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("CMS_DATABASE_URL"))?;

    tracing::info!("Connecting to CMS database...");
    let pool = cms_starter_backend::db::create_pool(&database_url).await?;

    tracing::info!("Running CMS migrations...");
    cms_starter_backend::db::migrate(&pool).await?;

    tracing::info!("CMS migrations complete!");
    Ok(())
}
