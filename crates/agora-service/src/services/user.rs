//! User service
//!
//! Profiles belong to the identity provider. This service mirrors the caller's
//! verified claims locally and resolves authors for embedding.

use std::collections::HashMap;

use agora_common::Claims;
use agora_core::{Snowflake, User};
use tracing::{info, instrument};

use crate::dto::UserResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Upsert the caller's profile from token claims and return it
    #[instrument(skip(self, claims), fields(sub = %claims.sub))]
    pub async fn sync_from_claims(&self, claims: &Claims) -> ServiceResult<UserResponse> {
        let user = claims.to_user()?;
        let stored = self.ctx.user_repo().upsert(&user).await?;

        info!(user_id = %stored.id, "User profile synced");
        Ok(UserResponse::from(stored))
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    /// Profiles for a set of author ids; unknown and absent ids are skipped
    pub async fn authors<I>(&self, ids: I) -> ServiceResult<HashMap<Snowflake, User>>
    where
        I: IntoIterator<Item = Option<Snowflake>>,
    {
        let mut wanted: Vec<Snowflake> = ids.into_iter().flatten().collect();
        wanted.sort_unstable();
        wanted.dedup();
        if wanted.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.ctx.user_repo().find_by_ids(&wanted).await?;
        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }
}
