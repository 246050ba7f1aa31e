//! Topic handlers
//!
//! Feed, search, single topic, thread view and the author-gated writes.

use agora_service::{
    CreateTopicRequest, DeleteResponse, ThreadResponse, ThreadService, TopicResponse,
    TopicService, UpdateTopicRequest,
};
use axum::{extract::State, Json};

use crate::extractors::{
    AuthUser, OptionalAuthUser, QueryParams, SearchParams, SnowflakePath, ThreadParams,
    TopicFeedParams, ValidatedJson,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /api/topics?sort=latest|trending|top&country=
pub async fn list_topics(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<TopicFeedParams>,
) -> ApiResult<Json<Vec<TopicResponse>>> {
    let service = TopicService::new(state.service_context());
    let topics = service.list_topics(params.sort, params.country).await?;
    Ok(Json(topics))
}

/// GET /api/topics/search?q=
pub async fn search_topics(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> ApiResult<Json<Vec<TopicResponse>>> {
    let service = TopicService::new(state.service_context());
    let topics = service.search_topics(&params.q).await?;
    Ok(Json(topics))
}

/// GET /api/topics/:id
pub async fn get_topic(
    State(state): State<AppState>,
    SnowflakePath(topic_id): SnowflakePath,
) -> ApiResult<Json<TopicResponse>> {
    let service = TopicService::new(state.service_context());
    Ok(Json(service.get_topic(topic_id).await?))
}

/// GET /api/topics/:id/thread?sort=likes|newest|engagement
pub async fn get_thread(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    SnowflakePath(topic_id): SnowflakePath,
    QueryParams(params): QueryParams<ThreadParams>,
) -> ApiResult<Json<ThreadResponse>> {
    let service = ThreadService::new(state.service_context());
    let thread = service
        .thread(topic_id, params.sort, viewer.user_id())
        .await?;
    Ok(Json(thread))
}

/// POST /api/topics
pub async fn create_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateTopicRequest>,
) -> ApiResult<Created<Json<TopicResponse>>> {
    let service = TopicService::new(state.service_context());
    let topic = service.create_topic(auth.user_id, request).await?;
    Ok(Created(Json(topic)))
}

/// PATCH /api/topics/:id
pub async fn update_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(topic_id): SnowflakePath,
    ValidatedJson(request): ValidatedJson<UpdateTopicRequest>,
) -> ApiResult<Json<TopicResponse>> {
    let service = TopicService::new(state.service_context());
    let topic = service.update_topic(topic_id, auth.user_id, request).await?;
    Ok(Json(topic))
}

/// DELETE /api/topics/:id
pub async fn delete_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(topic_id): SnowflakePath,
) -> ApiResult<Json<DeleteResponse>> {
    let service = TopicService::new(state.service_context());
    Ok(Json(service.delete_topic(topic_id, auth.user_id).await?))
}
