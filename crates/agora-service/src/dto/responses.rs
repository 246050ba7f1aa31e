//! Response DTOs for API endpoints
//!
//! Field names are camelCase and Snowflake ids serialize as strings.
//! Topic, node and reaction responses also deserialize so they can be cached.

use agora_core::{
    NodeType, ReactionKind, ReplyAffordance, Snowflake, SortOption, Threaded, TreeNode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Responses
// ============================================================================

/// Author embedded in topic and node responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: Snowflake,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// The caller's own profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Snowflake,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Topic Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: Snowflake,
    pub title: String,
    pub content: String,
    pub author_id: Option<Snowflake>,
    /// `None` once deleted, or when the profile is unknown
    pub author: Option<AuthorResponse>,
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub promoted_from_node_id: Option<Snowflake>,
    pub promoted_from_topic_id: Option<Snowflake>,
    pub agree_count: i32,
    pub disagree_count: i32,
    pub like_count: i32,
    pub dislike_count: i32,
    pub node_count: i32,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Result of deleting a topic or node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: bool,
    /// `false` when the row was physically removed
    pub soft_deleted: bool,
}

// ============================================================================
// Node Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    pub id: Snowflake,
    pub topic_id: Snowflake,
    pub parent_id: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    pub author: Option<AuthorResponse>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
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

impl Threaded for NodeResponse {
    fn id(&self) -> Snowflake {
        self.id
    }

    fn parent_id(&self) -> Option<Snowflake> {
        self.parent_id
    }

    fn like_count(&self) -> i32 {
        self.like_count
    }

    fn dislike_count(&self) -> i32 {
        self.dislike_count
    }

    fn reply_count(&self) -> i32 {
        self.reply_count
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// Reaction Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionResponse {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub topic_id: Snowflake,
    /// `None` for a reaction on the topic itself
    pub node_id: Option<Snowflake>,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Thread Responses
// ============================================================================

/// A topic with its reply forest, ordered and annotated for display.
/// `nodes` goes over the wire flattened in display order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub topic: TopicResponse,
    pub sort: SortOption,
    #[serde(serialize_with = "agora_core::serialize_preorder")]
    pub nodes: Vec<TreeNode<NodeResponse>>,
    /// Present only for an authenticated caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_reactions: Option<Vec<ReactionResponse>>,
}

impl ThreadResponse {
    /// Where a reply to `node_id` should be attached, if the node is in this thread
    pub fn reply_affordance(&self, node_id: Snowflake) -> Option<ReplyAffordance> {
        let mut stack: Vec<&TreeNode<NodeResponse>> = self.nodes.iter().collect();
        while let Some(entry) = stack.pop() {
            if entry.item.id == node_id {
                return entry.reply;
            }
            stack.extend(entry.children.iter());
        }
        None
    }
}

// ============================================================================
// Health Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// `None` means the dependency is not configured
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub cache: String,
}

fn check_label(check: Option<bool>) -> String {
    match check {
        Some(true) => "healthy",
        Some(false) => "unhealthy",
        None => "disabled",
    }
    .to_string()
}

impl ReadinessResponse {
    pub fn ready(database: Option<bool>, cache: Option<bool>) -> Self {
        let all_healthy = database != Some(false) && cache != Some(false);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: check_label(database),
                cache: check_label(cache),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
