//! End-user repository: accounts and bearer tokens.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cms_starter_core::{Email, RoleId, UserId};

use super::RepositoryError;
use crate::models::UserRecord;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    provider: String,
    confirmed: bool,
    blocked: bool,
    role_id: Option<RoleId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: row.id,
            username: row.username,
            email,
            provider: row.provider,
            confirmed: row.confirmed,
            blocked: row.blocked,
            role_id: row.role_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for `up_user` and `up_token`.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email or username, together with the password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn find_credentials(
        &self,
        identifier: &str,
    ) -> Result<Option<(UserRecord, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, username, email, provider, confirmed, blocked, role_id,
                   created_at, updated_at, password_hash
            FROM up_user
            WHERE email = lower($1) OR username = $1
            LIMIT 1
            ",
        )
        .bind(identifier.trim())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((UserRecord::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        role_id: Option<RoleId>,
    ) -> Result<UserRecord, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO up_user (username, email, password_hash, role_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, provider, confirmed, blocked, role_id,
                      created_at, updated_at
            ",
        )
        .bind(username)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "username or email"))?;

        UserRecord::try_from(row)
    }

    /// Store the hash of a freshly issued bearer token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn store_token(&self, user_id: UserId, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO up_token (token_hash, user_id) VALUES ($1, $2)")
            .bind(token_hash)
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "token"))?;
        Ok(())
    }

    /// Resolve a token hash to its user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_token(&self, token_hash: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT u.id, u.username, u.email, u.provider, u.confirmed, u.blocked, u.role_id,
                   u.created_at, u.updated_at
            FROM up_token t
            JOIN up_user u ON u.id = t.user_id
            WHERE t.token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }
}
