//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use agora_core::{
    DomainError, Reaction, ReactionKind, ReactionRepository, ReactionTally, ReactionTarget,
    RepoResult, Snowflake,
};

use crate::mappers::reaction_tally;
use crate::models::{ReactionCountModel, ReactionModel};

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
        target: ReactionTarget,
    ) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, topic_id, node_id, reaction_type, created_at
            FROM reactions
            WHERE user_id = $1 AND topic_id = $2 AND node_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(topic_id.into_inner())
        .bind(target.node_id().map(Snowflake::into_inner))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Reaction::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user_in_topic(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
    ) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT id, user_id, topic_id, node_id, reaction_type, created_at
            FROM reactions
            WHERE user_id = $1 AND topic_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id.into_inner())
        .bind(topic_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Reaction::try_from).collect()
    }

    #[instrument(skip(self, reaction), fields(reaction_id = %reaction.id))]
    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reactions (id, user_id, topic_id, node_id, reaction_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reaction.id.into_inner())
        .bind(reaction.user_id.into_inner())
        .bind(reaction.topic_id.into_inner())
        .bind(reaction.node_id().map(Snowflake::into_inner))
        .bind(reaction.kind.as_str())
        .bind(reaction.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReactionAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_kind(&self, id: Snowflake, kind: ReactionKind) -> RepoResult<()> {
        sqlx::query("UPDATE reactions SET reaction_type = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM reactions WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn tally(&self, topic_id: Snowflake, target: ReactionTarget) -> RepoResult<ReactionTally> {
        let rows = sqlx::query_as::<_, ReactionCountModel>(
            r#"
            SELECT reaction_type, COUNT(*) AS count
            FROM reactions
            WHERE topic_id = $1 AND node_id IS NOT DISTINCT FROM $2
            GROUP BY reaction_type
            "#,
        )
        .bind(topic_id.into_inner())
        .bind(target.node_id().map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        reaction_tally(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgReactionRepository>();
    }
}
