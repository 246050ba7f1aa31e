//! Authentication handlers
//!
//! Tokens come from the identity provider; this only mirrors the caller's profile.

use agora_service::{UserResponse, UserService};
use axum::{extract::State, Json};

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /api/auth/user
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.sync_from_claims(&auth.claims).await?))
}
