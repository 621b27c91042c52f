//! Home singleton repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cms_starter_core::{HomeContent, HomeId, HomeInput};

use super::RepositoryError;

const HOME_COLUMNS: &str =
    "id, document_id, welcome_text, subtitle, content, created_at, updated_at, published_at";

#[derive(sqlx::FromRow)]
struct HomeRow {
    id: HomeId,
    document_id: Uuid,
    welcome_text: String,
    subtitle: Option<String>,
    content: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl From<HomeRow> for HomeContent {
    fn from(row: HomeRow) -> Self {
        Self {
            id: row.id,
            document_id: row.document_id.to_string(),
            welcome_text: row.welcome_text,
            subtitle: row.subtitle,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
        }
    }
}

/// Repository for the `home` table (at most one row).
pub struct HomeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HomeRepository<'a> {
    /// Create a new home repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the singleton row, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(&self) -> Result<Option<HomeContent>, RepositoryError> {
        let row = sqlx::query_as::<_, HomeRow>(&format!("SELECT {HOME_COLUMNS} FROM home LIMIT 1"))
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(HomeContent::from))
    }

    /// Insert the singleton row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a row already exists.
    pub async fn create(
        &self,
        input: &HomeInput,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<HomeContent, RepositoryError> {
        let row = sqlx::query_as::<_, HomeRow>(&format!(
            r"
            INSERT INTO home (document_id, welcome_text, subtitle, content, published_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {HOME_COLUMNS}
            "
        ))
        .bind(Uuid::new_v4())
        .bind(&input.welcome_text)
        .bind(&input.subtitle)
        .bind(&input.content)
        .bind(published_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "home content"))?;

        Ok(row.into())
    }

    /// Update the singleton row, creating (and publishing) it if missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn upsert(&self, input: &HomeInput) -> Result<HomeContent, RepositoryError> {
        let updated = sqlx::query_as::<_, HomeRow>(&format!(
            r"
            UPDATE home
            SET welcome_text = $1, subtitle = $2, content = $3, updated_at = NOW()
            RETURNING {HOME_COLUMNS}
            "
        ))
        .bind(&input.welcome_text)
        .bind(&input.subtitle)
        .bind(&input.content)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row.into()),
            None => self.create(input, Some(Utc::now())).await,
        }
    }

    /// Delete the singleton row, returning it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self) -> Result<Option<HomeContent>, RepositoryError> {
        let row = sqlx::query_as::<_, HomeRow>(&format!("DELETE FROM home RETURNING {HOME_COLUMNS}"))
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(HomeContent::from))
    }
}
