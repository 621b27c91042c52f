//! Home singleton route handlers.

use axum::{Json, extract::State};

use cms_starter_core::{DataPayload, Envelope, HomeContent, HomeInput, PermissionAction, RoleType};

use crate::db::HomeRepository;
use crate::error::{ApiError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::state::AppState;

/// Check that the caller's role may perform `operation` on the home type.
///
/// Authenticated callers also inherit everything granted to the public role.
async fn authorize(state: &AppState, authenticated: bool, operation: &str) -> Result<()> {
    let action = PermissionAction::for_content_type(HomeContent::UID, operation);
    let permissions = state.permissions();

    let mut allowed = false;
    if authenticated {
        allowed = permissions
            .allows(state.pool(), RoleType::Authenticated, &action)
            .await?;
    }
    if !allowed {
        allowed = permissions
            .allows(state.pool(), RoleType::Public, &action)
            .await?;
    }

    if allowed {
        Ok(())
    } else {
        tracing::debug!(%action, authenticated, "Permission denied");
        Err(ApiError::Forbidden)
    }
}

/// `GET /api/home`
///
/// Query parameters (`populate`, `fields`, ...) are accepted and ignored: the
/// home type has no relations.
#[tracing::instrument(skip_all)]
pub async fn find(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<Envelope<Option<HomeContent>>>> {
    authorize(&state, user.is_some(), "find").await?;

    let home = HomeRepository::new(state.pool()).find().await?;
    Ok(Json(Envelope::new(home)))
}

/// `PUT /api/home`
#[tracing::instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(payload): Json<DataPayload<HomeInput>>,
) -> Result<Json<Envelope<HomeContent>>> {
    authorize(&state, true, "update").await?;

    let input = payload.data;
    if input.welcome_text.trim().is_empty() {
        return Err(ApiError::Validation("welcome_text must not be empty".to_owned()));
    }

    let home = HomeRepository::new(state.pool()).upsert(&input).await?;
    tracing::info!(home_id = %home.id, user_id = %user.id, "Home content updated");
    Ok(Json(Envelope::new(home)))
}

/// `DELETE /api/home`
#[tracing::instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Envelope<HomeContent>>> {
    authorize(&state, true, "delete").await?;

    let home = HomeRepository::new(state.pool())
        .delete()
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(home_id = %home.id, user_id = %user.id, "Home content deleted");
    Ok(Json(Envelope::new(home)))
}
