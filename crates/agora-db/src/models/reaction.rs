//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub id: i64,
    pub user_id: i64,
    pub topic_id: i64,
    pub node_id: Option<i64>,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
}

/// Grouped reaction count (from query)
#[derive(Debug, Clone, FromRow)]
pub struct ReactionCountModel {
    pub reaction_type: String,
    pub count: i64,
}
