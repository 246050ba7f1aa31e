//! User handlers

use agora_service::{TopicResponse, TopicService};
use axum::{extract::State, Json};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /api/users/me/topics
pub async fn get_my_topics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TopicResponse>>> {
    let service = TopicService::new(state.service_context());
    Ok(Json(service.user_topics(auth.user_id).await?))
}
