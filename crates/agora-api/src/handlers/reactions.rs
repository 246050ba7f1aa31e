//! Reaction handlers

use agora_service::{ReactionResponse, ReactionService, ToggleReactionRequest};
use axum::{extract::State, Json};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /api/reactions/:topic_id
pub async fn get_my_reactions(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(topic_id): SnowflakePath,
) -> ApiResult<Json<Vec<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.user_reactions(auth.user_id, topic_id).await?))
}

/// POST /api/reactions
///
/// Responds with the reaction now in place, or `null` when the toggle cleared it.
pub async fn toggle_reaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ToggleReactionRequest>,
) -> ApiResult<Json<Option<ReactionResponse>>> {
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.toggle_reaction(auth.user_id, request).await?))
}
