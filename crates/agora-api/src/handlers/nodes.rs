//! Node handlers
//!
//! `/api/nodes/:id` is a topic id for GET and a node id for PATCH and DELETE.

use agora_service::{
    CreateNodeRequest, DeleteResponse, NodeResponse, NodeService, PromoteNodeRequest,
    TopicResponse, UpdateNodeRequest,
};
use axum::{extract::State, Json};

use crate::extractors::{AuthUser, SnowflakePath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /api/nodes/:topic_id
pub async fn get_topic_nodes(
    State(state): State<AppState>,
    SnowflakePath(topic_id): SnowflakePath,
) -> ApiResult<Json<Vec<NodeResponse>>> {
    let service = NodeService::new(state.service_context());
    Ok(Json(service.topic_nodes(topic_id).await?))
}

/// POST /api/nodes
pub async fn create_node(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateNodeRequest>,
) -> ApiResult<Created<Json<NodeResponse>>> {
    let service = NodeService::new(state.service_context());
    let node = service.create_node(auth.user_id, request).await?;
    Ok(Created(Json(node)))
}

/// PATCH /api/nodes/:id
pub async fn update_node(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(node_id): SnowflakePath,
    ValidatedJson(request): ValidatedJson<UpdateNodeRequest>,
) -> ApiResult<Json<NodeResponse>> {
    let service = NodeService::new(state.service_context());
    let node = service.update_node(node_id, auth.user_id, request).await?;
    Ok(Json(node))
}

/// DELETE /api/nodes/:id
pub async fn delete_node(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(node_id): SnowflakePath,
) -> ApiResult<Json<DeleteResponse>> {
    let service = NodeService::new(state.service_context());
    Ok(Json(service.delete_node(node_id, auth.user_id).await?))
}

/// POST /api/nodes/:id/promote
pub async fn promote_node(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakePath(node_id): SnowflakePath,
    ValidatedJson(request): ValidatedJson<PromoteNodeRequest>,
) -> ApiResult<Created<Json<TopicResponse>>> {
    let service = NodeService::new(state.service_context());
    let topic = service.promote_node(node_id, auth.user_id, request).await?;
    Ok(Created(Json(topic)))
}
