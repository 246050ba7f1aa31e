//! PostgreSQL implementation of TopicRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use agora_core::{
    DomainError, RepoResult, Snowflake, Topic, TopicCounters, TopicQuery, TopicRepository,
    TopicSort,
};

use crate::models::TopicModel;

use super::error::{like_pattern, map_db_error};

#[derive(Clone)]
pub struct PgTopicRepository {
    pool: PgPool,
}

impl PgTopicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_clause(sort: TopicSort) -> &'static str {
    match sort {
        TopicSort::Latest => "created_at DESC, id DESC",
        TopicSort::Top => "like_count DESC, created_at DESC, id DESC",
        TopicSort::Trending => "(like_count + node_count * 2) DESC, created_at DESC, id DESC",
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>> {
        let query = format!("SELECT {} FROM topics WHERE id = $1", TopicModel::COLUMNS);
        let result = sqlx::query_as::<_, TopicModel>(&query)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Topic::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &TopicQuery) -> RepoResult<Vec<Topic>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM topics
            WHERE is_deleted = FALSE
              AND ($1::TEXT IS NULL OR country = $1)
            ORDER BY {}
            LIMIT $2
            "#,
            TopicModel::COLUMNS,
            order_clause(query.sort)
        );
        let results = sqlx::query_as::<_, TopicModel>(&sql)
            .bind(query.country.as_deref())
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Topic::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, needle: &str, limit: i64) -> RepoResult<Vec<Topic>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM topics
            WHERE is_deleted = FALSE
              AND (title ILIKE $1 OR content ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            TopicModel::COLUMNS
        );
        let results = sqlx::query_as::<_, TopicModel>(&sql)
            .bind(like_pattern(needle))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Topic::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Topic>> {
        let sql = format!(
            "SELECT {} FROM topics WHERE author_id = $1 ORDER BY created_at DESC, id DESC",
            TopicModel::COLUMNS
        );
        let results = sqlx::query_as::<_, TopicModel>(&sql)
            .bind(author_id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Topic::from).collect())
    }

    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    async fn create(&self, topic: &Topic) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO topics (
                id, title, content, author_id, image_url, country,
                promoted_from_node_id, promoted_from_topic_id,
                agree_count, disagree_count, like_count, dislike_count, node_count,
                is_deleted, edited_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(topic.id.into_inner())
        .bind(&topic.title)
        .bind(&topic.content)
        .bind(topic.author_id.map(Snowflake::into_inner))
        .bind(topic.image_url.as_deref())
        .bind(topic.country.as_deref())
        .bind(topic.promoted_from.map(|p| p.node_id.into_inner()))
        .bind(topic.promoted_from.map(|p| p.topic_id.into_inner()))
        .bind(topic.counters.agree)
        .bind(topic.counters.disagree)
        .bind(topic.counters.like)
        .bind(topic.counters.dislike)
        .bind(topic.counters.node)
        .bind(topic.is_deleted)
        .bind(topic.edited_at)
        .bind(topic.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, topic), fields(topic_id = %topic.id))]
    async fn update(&self, topic: &Topic) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE topics
            SET title = $2, content = $3, edited_at = $4
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(topic.id.into_inner())
        .bind(&topic.title)
        .bind(&topic.content)
        .bind(topic.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TopicNotFound(topic.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE topics SET is_deleted = TRUE, author_id = NULL
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TopicNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()> {
        // nodes and reactions go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TopicNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_counters(&self, id: Snowflake, counters: &TopicCounters) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE topics
            SET agree_count = $2, disagree_count = $3, like_count = $4,
                dislike_count = $5, node_count = $6
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .bind(counters.agree)
        .bind(counters.disagree)
        .bind(counters.like)
        .bind(counters.dislike)
        .bind(counters.node)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
