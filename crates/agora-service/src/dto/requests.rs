//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Length limits count characters, not bytes.

use agora_core::{NodeType, ReactionKind, Snowflake};
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// Topic Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    #[validate(length(min = 1, max = 500, message = "Title must be 1-500 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Content must be at most 5000 characters"))]
    #[serde(default)]
    pub content: String,

    #[validate(length(max = 2048, message = "Image URL must be at most 2048 characters"))]
    pub image_url: Option<String>,

    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: Option<String>,
}

// ============================================================================
// Node Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNodeRequest {
    pub topic_id: Snowflake,

    /// Omitted or null for a top-level response
    #[serde(default)]
    pub parent_id: Option<Snowflake>,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,

    #[validate(length(max = 2048, message = "Image URL must be at most 2048 characters"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNodeRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromoteNodeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
}

// ============================================================================
// Reaction Requests
// ============================================================================

/// Like or dislike a topic (`nodeId` absent) or one of its nodes.
///
/// For node reactions the owning topic is read from the node; a `topicId` sent
/// alongside is not trusted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_reaction_target"))]
pub struct ToggleReactionRequest {
    #[serde(default)]
    pub topic_id: Option<Snowflake>,

    #[serde(default)]
    pub node_id: Option<Snowflake>,

    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

fn validate_reaction_target(request: &ToggleReactionRequest) -> Result<(), ValidationError> {
    if request.topic_id.is_none() && request.node_id.is_none() {
        let mut error = ValidationError::new("missing_target");
        error.message = Some("Either topicId or nodeId is required".into());
        return Err(error);
    }
    Ok(())
}
