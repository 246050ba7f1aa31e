//! Node database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `nodes` table
#[derive(Debug, Clone, FromRow)]
pub struct NodeModel {
    pub id: i64,
    pub topic_id: i64,
    pub parent_id: Option<i64>,
    pub author_id: Option<i64>,
    pub node_type: String,
    pub content: String,
    pub image_url: Option<String>,
    pub agree_count: i32,
    pub disagree_count: i32,
    pub like_count: i32,
    pub dislike_count: i32,
    pub reply_count: i32,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NodeModel {
    pub const COLUMNS: &'static str = "id, topic_id, parent_id, author_id, node_type, content, \
        image_url, agree_count, disagree_count, like_count, dislike_count, reply_count, \
        is_deleted, edited_at, created_at";
}

/// Grouped node count (from query)
#[derive(Debug, Clone, FromRow)]
pub struct StanceCountModel {
    pub node_type: String,
    pub is_deleted: bool,
    pub count: i64,
}
