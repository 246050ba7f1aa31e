//! Test fixtures and data generators
//!
//! Request bodies and the subset of response fields the tests inspect.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopic {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl CreateTopic {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: format!("Thoughts on {title}"),
            image_url: None,
            country: None,
        }
    }

    pub fn in_country(mut self, country: &str) -> Self {
        self.country = Some(country.to_string());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNode {
    pub topic_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    pub content: String,
}

impl CreateNode {
    pub fn new(topic_id: &str, node_type: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            parent_id: None,
            node_type: node_type.to_string(),
            content: format!("An {node_type} response"),
        }
    }

    pub fn reply_to(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ToggleReaction {
    pub fn on_topic(topic_id: &str, kind: &str) -> Self {
        Self {
            topic_id: Some(topic_id.to_string()),
            node_id: None,
            kind: kind.to_string(),
        }
    }

    pub fn on_node(topic_id: &str, node_id: &str, kind: &str) -> Self {
        Self {
            topic_id: Some(topic_id.to_string()),
            node_id: Some(node_id.to_string()),
            kind: kind.to_string(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: Option<String>,
    pub author: Option<Author>,
    pub country: Option<String>,
    pub promoted_from_node_id: Option<String>,
    pub promoted_from_topic_id: Option<String>,
    pub agree_count: i32,
    pub disagree_count: i32,
    pub like_count: i32,
    pub dislike_count: i32,
    pub node_count: i32,
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub topic_id: String,
    pub parent_id: Option<String>,
    pub author_id: Option<String>,
    pub author: Option<Author>,
    #[serde(rename = "type")]
    pub node_type: String,
    pub content: String,
    pub like_count: i32,
    pub reply_count: i32,
    pub is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: String,
    pub topic_id: String,
    pub node_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub success: bool,
    pub soft_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntry {
    pub id: String,
    pub parent_id: Option<String>,
    pub depth: usize,
    pub can_reply: bool,
    pub reply_target_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub topic: Topic,
    pub sort: String,
    pub nodes: Vec<ThreadEntry>,
    pub my_reactions: Option<Vec<Reaction>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: String,
}
