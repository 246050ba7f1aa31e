//! PostgreSQL implementation of NodeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use agora_core::{
    ChildTally, DomainError, Node, NodeCounters, NodeRepository, RepoResult, Snowflake,
    StanceTally,
};

use crate::mappers::{child_tally, stance_tally};
use crate::models::{NodeModel, StanceCountModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgNodeRepository {
    pool: PgPool,
}

impl PgNodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeRepository for PgNodeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Node>> {
        let sql = format!("SELECT {} FROM nodes WHERE id = $1", NodeModel::COLUMNS);
        let result = sqlx::query_as::<_, NodeModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Node::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<Node>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM nodes
            WHERE topic_id = $1
            ORDER BY like_count DESC, created_at ASC, id ASC
            "#,
            NodeModel::COLUMNS
        );
        let results = sqlx::query_as::<_, NodeModel>(&sql)
            .bind(topic_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(Node::try_from).collect()
    }

    #[instrument(skip(self, node), fields(node_id = %node.id, topic_id = %node.topic_id))]
    async fn create(&self, node: &Node) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO nodes (
                id, topic_id, parent_id, author_id, node_type, content, image_url,
                agree_count, disagree_count, like_count, dislike_count, reply_count,
                is_deleted, edited_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(node.id.into_inner())
        .bind(node.topic_id.into_inner())
        .bind(node.parent_id.map(Snowflake::into_inner))
        .bind(node.author_id.map(Snowflake::into_inner))
        .bind(node.node_type.as_str())
        .bind(&node.content)
        .bind(node.image_url.as_deref())
        .bind(node.counters.agree)
        .bind(node.counters.disagree)
        .bind(node.counters.like)
        .bind(node.counters.dislike)
        .bind(node.counters.reply)
        .bind(node.is_deleted)
        .bind(node.edited_at)
        .bind(node.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, node), fields(node_id = %node.id))]
    async fn update(&self, node: &Node) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE nodes SET content = $2, edited_at = $3
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(node.id.into_inner())
        .bind(&node.content)
        .bind(node.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NodeNotFound(node.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE nodes SET is_deleted = TRUE, author_id = NULL
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NodeNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NodeNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_by_topic(&self, topic_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM nodes WHERE topic_id = $1")
            .bind(topic_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn tally_by_topic(&self, topic_id: Snowflake) -> RepoResult<StanceTally> {
        let rows = sqlx::query_as::<_, StanceCountModel>(
            r#"
            SELECT node_type, is_deleted, COUNT(*) AS count
            FROM nodes
            WHERE topic_id = $1 AND is_deleted = FALSE
            GROUP BY node_type, is_deleted
            "#,
        )
        .bind(topic_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        stance_tally(&rows)
    }

    #[instrument(skip(self))]
    async fn tally_children(&self, parent_id: Snowflake) -> RepoResult<ChildTally> {
        let rows = sqlx::query_as::<_, StanceCountModel>(
            r#"
            SELECT node_type, is_deleted, COUNT(*) AS count
            FROM nodes
            WHERE parent_id = $1
            GROUP BY node_type, is_deleted
            "#,
        )
        .bind(parent_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        child_tally(&rows)
    }

    #[instrument(skip(self))]
    async fn update_counters(&self, id: Snowflake, counters: &NodeCounters) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE nodes
            SET agree_count = $2, disagree_count = $3, like_count = $4,
                dislike_count = $5, reply_count = $6
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(counters.agree)
        .bind(counters.disagree)
        .bind(counters.like)
        .bind(counters.dislike)
        .bind(counters.reply)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
