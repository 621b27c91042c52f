//! Bearer token extractors.
//!
//! API callers authenticate with `Authorization: Bearer <token>`, where the
//! token was issued by `/api/auth/local` or `/api/auth/local/register`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::models::UserRecord;
use crate::services::auth::AuthService;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Missing or invalid credentials";

/// Extract the bearer token from the `Authorization` header.
///
/// Returns `Ok(None)` if the header is absent, an error if it is present but
/// not a bearer credential.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_owned()))?;

    Ok(Some(token))
}

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 if the token is missing, unknown, or belongs to a blocked
/// user.
pub struct RequireUser(pub UserRecord);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state).await?;
        user.map(Self)
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_owned()))
    }
}

/// Extractor for endpoints open to anonymous callers.
///
/// `None` means no `Authorization` header was sent. A header carrying an
/// unknown token is still rejected with 401.
pub struct OptionalUser(pub Option<UserRecord>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            return Ok(Self(None));
        };

        let user = AuthService::new(state.pool())
            .authenticate(token)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_owned()))?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(user.id.to_string()),
                username: Some(user.username.clone()),
                ..Default::default()
            }));
        });

        Ok(Self(Some(user)))
    }
}
