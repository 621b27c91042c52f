//! REST error handling with Sentry integration.
//!
//! Every handler returns `Result<T, ApiError>`. Errors are rendered in the
//! CMS error envelope:
//!
//! ```json
//! { "data": null, "error": { "status": 403, "name": "ForbiddenError", "message": "Forbidden", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use cms_starter_core::ApiErrorBody;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Error type for REST handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Caller's role lacks the required permission.
    #[error("Forbidden")]
    Forbidden,

    /// Endpoint requires a valid bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request body failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::UserAlreadyExists
                | AuthError::Validation(_)
                | AuthError::InvalidEmail(_)
                | AuthError::Blocked => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn name(status: StatusCode) -> &'static str {
        match status {
            StatusCode::BAD_REQUEST => "ValidationError",
            StatusCode::UNAUTHORIZED => "UnauthorizedError",
            StatusCode::FORBIDDEN => "ForbiddenError",
            StatusCode::NOT_FOUND => "NotFoundError",
            _ => "InternalServerError",
        }
    }

    // Don't expose internal error details to clients
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal Server Error".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid identifier or password".to_owned(),
                AuthError::UserAlreadyExists => "Email or Username are already taken".to_owned(),
                AuthError::Validation(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "email must be a valid email".to_owned(),
                AuthError::Blocked => "Your account has been blocked by an administrator".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal Server Error".to_owned()
                }
            },
            Self::Forbidden => "Forbidden".to_owned(),
            Self::Unauthorized(msg) | Self::Validation(msg) => msg.clone(),
            Self::NotFound => "Not Found".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ApiErrorBody::new(status.as_u16(), Self::name(status), &self.public_message());
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: ApiError) -> (StatusCode, ApiErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_forbidden_envelope() {
        let (status, body) = render(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.data.is_none());
        assert_eq!(body.error.status, 403);
        assert_eq!(body.error.name, "ForbiddenError");
        assert_eq!(body.error.message, "Forbidden");
    }

    #[tokio::test]
    async fn test_invalid_credentials_is_validation_error() {
        let (status, body) = render(ApiError::Auth(AuthError::InvalidCredentials)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.name, "ValidationError");
        assert_eq!(body.error.message, "Invalid identifier or password");
    }

    #[tokio::test]
    async fn test_duplicate_user_message() {
        let (status, body) = render(ApiError::Auth(AuthError::UserAlreadyExists)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.message, "Email or Username are already taken");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, body) = render(ApiError::Internal("pool exhausted".to_owned())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.name, "InternalServerError");
        assert!(!body.error.message.contains("pool"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthorized("x".to_owned()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Validation("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Database(RepositoryError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
