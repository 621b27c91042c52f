//! Local authentication route handlers.

use axum::{Json, extract::State};

use cms_starter_core::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::{ApiError, Result};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// `POST /api/auth/local`
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if request.identifier.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "identifier and password are required".to_owned(),
        ));
    }

    let response = AuthService::new(state.pool())
        .login(request.identifier.trim(), &request.password)
        .await?;

    tracing::info!(user_id = %response.user.id, "User logged in");
    Ok(Json(response))
}

/// `POST /api/auth/local/register`
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let response = AuthService::new(state.pool())
        .register(&request.username, &request.email, &request.password)
        .await?;
    Ok(Json(response))
}
