use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use axioma_shared::FavoriteIndicator;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::parse_lang;
use crate::auth::AuthenticatedRequest;
use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub indicator_id: i32,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub success: bool,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct FavoritesParams {
    pub lang: Option<String>,
}

/// Sets the favorite flag of an indicator for the authenticated user.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedRequest>,
    payload: Result<Json<ToggleFavoriteRequest>, JsonRejection>,
) -> Result<Json<ToggleFavoriteResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let stored = state
        .engines
        .users
        .toggle_favorite(auth.user.id, payload.indicator_id, payload.is_favorite)
        .await?;

    info!(
        user_id = auth.user.id,
        indicator_id = payload.indicator_id,
        is_favorite = stored,
        "Favorite updated"
    );

    Ok(Json(ToggleFavoriteResponse {
        success: true,
        is_favorite: stored,
    }))
}

/// Favorite indicators of the authenticated user, most recently updated first.
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedRequest>,
    Query(params): Query<FavoritesParams>,
) -> Result<Json<Vec<FavoriteIndicator>>, ApiError> {
    let lang = parse_lang(params.lang.as_deref())?;
    let favorites = state.engines.users.list_favorites(auth.user.id, lang).await?;
    Ok(Json(favorites))
}
