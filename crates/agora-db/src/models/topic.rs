//! Topic database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `topics` table
#[derive(Debug, Clone, FromRow)]
pub struct TopicModel {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: Option<i64>,
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub promoted_from_node_id: Option<i64>,
    pub promoted_from_topic_id: Option<i64>,
    pub agree_count: i32,
    pub disagree_count: i32,
    pub like_count: i32,
    pub dislike_count: i32,
    pub node_count: i32,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TopicModel {
    /// Column list matching the struct, for `SELECT` and `RETURNING`
    pub const COLUMNS: &'static str = "id, title, content, author_id, image_url, country, \
        promoted_from_node_id, promoted_from_topic_id, agree_count, disagree_count, \
        like_count, dislike_count, node_count, is_deleted, edited_at, created_at";
}
