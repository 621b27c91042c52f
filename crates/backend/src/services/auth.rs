//! Local (email/username + password) authentication.
//!
//! Passwords are hashed with Argon2id. Bearer tokens are 32 random bytes,
//! base64url-encoded for the client; only their SHA-256 digest is stored.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use thiserror::Error;

use cms_starter_core::{AuthResponse, Email, EmailError, RoleType};

use crate::db::{RepositoryError, RoleRepository, UserRepository};
use crate::models::UserRecord;

/// Minimum password length for API users.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Token length in random bytes.
const TOKEN_BYTES: usize = 32;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong identifier or password.
    #[error("invalid identifier or password")]
    InvalidCredentials,

    /// Username or email already registered.
    #[error("email or username are already taken")]
    UserAlreadyExists,

    /// Registration input rejected.
    #[error("{0}")]
    Validation(String),

    /// Account is blocked.
    #[error("account is blocked")]
    Blocked,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    roles: RoleRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            roles: RoleRepository::new(pool),
        }
    }

    /// Register a user with the `authenticated` role and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for an empty username or short password,
    /// `AuthError::InvalidEmail` for a malformed email and
    /// `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("username is required".to_owned()));
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let role_id = self
            .roles
            .find_by_type(RoleType::Authenticated)
            .await?
            .map(|role| role.id);

        let user = self
            .users
            .create(username, &email, &password_hash, role_id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.issue(user).await
    }

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the identifier is unknown or
    /// the password is wrong, `AuthError::Blocked` for blocked accounts.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let (user, password_hash) = self
            .users
            .find_credentials(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if user.blocked {
            return Err(AuthError::Blocked);
        }

        self.issue(user).await
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn authenticate(&self, token: &str) -> Result<Option<UserRecord>, AuthError> {
        let user = self.users.find_by_token(&hash_token(token)).await?;
        Ok(user.filter(|u| !u.blocked))
    }

    async fn issue(&self, user: UserRecord) -> Result<AuthResponse, AuthError> {
        let token = generate_token();
        self.users.store_token(user.id, &hash_token(&token)).await?;
        Ok(AuthResponse {
            jwt: token,
            user: user.into(),
        })
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a new opaque bearer token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Digest stored in `up_token.token_hash`.
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
