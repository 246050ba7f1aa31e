//! Reaction service
//!
//! One like or dislike per user per target. Toggling walks three states:
//! no reaction → created, same kind → removed, other kind → switched.

use agora_core::{DomainError, Reaction, ReactionTarget, Snowflake};
use tracing::{info, instrument};

use crate::dto::{ReactionResponse, ToggleReactionRequest};

use super::aggregate::AggregateService;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The caller's reactions within one topic, topic-level and node-level
    #[instrument(skip(self))]
    pub async fn user_reactions(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
    ) -> ServiceResult<Vec<ReactionResponse>> {
        let reactions = self
            .ctx
            .reaction_repo()
            .find_by_user_in_topic(user_id, topic_id)
            .await?;
        Ok(reactions.iter().map(ReactionResponse::from).collect())
    }

    /// Apply a toggle and return the reaction now in place, `None` if cleared
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn toggle_reaction(
        &self,
        user_id: Snowflake,
        request: ToggleReactionRequest,
    ) -> ServiceResult<Option<ReactionResponse>> {
        let (topic_id, target) = self.resolve_target(&request).await?;
        let repo = self.ctx.reaction_repo();

        let current = match repo.find(user_id, topic_id, target).await? {
            None => {
                let reaction =
                    Reaction::new(self.ctx.generate_id(), user_id, topic_id, target, request.kind);
                repo.create(&reaction).await?;
                info!(reaction_id = %reaction.id, topic_id = %topic_id, "Reaction added");
                Some(reaction)
            }
            Some(existing) if existing.kind == request.kind => {
                repo.delete(existing.id).await?;
                info!(reaction_id = %existing.id, topic_id = %topic_id, "Reaction removed");
                None
            }
            Some(mut existing) => {
                repo.update_kind(existing.id, request.kind).await?;
                existing.kind = request.kind;
                info!(reaction_id = %existing.id, topic_id = %topic_id, "Reaction switched");
                Some(existing)
            }
        };

        AggregateService::new(self.ctx)
            .recompute_target(topic_id, target)
            .await?;
        self.ctx.invalidate_topic(topic_id).await;

        Ok(current.map(ReactionResponse::from))
    }

    /// A node target carries its own topic; deleted content takes no reactions
    async fn resolve_target(
        &self,
        request: &ToggleReactionRequest,
    ) -> ServiceResult<(Snowflake, ReactionTarget)> {
        if let Some(node_id) = request.node_id {
            let node = self
                .ctx
                .node_repo()
                .find_by_id(node_id)
                .await?
                .ok_or(DomainError::NodeNotFound(node_id))?;
            if node.is_deleted {
                return Err(DomainError::TargetDeleted.into());
            }
            return Ok((node.topic_id, ReactionTarget::Node(node_id)));
        }

        let topic_id = request
            .topic_id
            .ok_or_else(|| DomainError::ValidationError("topicId or nodeId is required".to_string()))?;
        let topic = self
            .ctx
            .topic_repo()
            .find_by_id(topic_id)
            .await?
            .ok_or(DomainError::TopicNotFound(topic_id))?;
        if topic.is_deleted {
            return Err(DomainError::TargetDeleted.into());
        }
        Ok((topic_id, ReactionTarget::Topic))
    }
}
