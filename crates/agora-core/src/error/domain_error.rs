//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Topic not found: {0}")]
    TopicNotFound(Snowflake),

    #[error("Node not found: {0}")]
    NodeNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Parent node {parent_id} does not belong to topic {topic_id}")]
    ParentOutsideTopic {
        parent_id: Snowflake,
        topic_id: Snowflake,
    },

    #[error("Cannot reply to a deleted node")]
    ParentDeleted,

    #[error("Cannot react to deleted content")]
    TargetDeleted,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not topic author")]
    NotTopicAuthor,

    #[error("Not node author")]
    NotNodeAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Reaction already exists")]
    ReactionAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::NodeNotFound(_) => "UNKNOWN_NODE",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::ParentOutsideTopic { .. } => "PARENT_OUTSIDE_TOPIC",
            Self::ParentDeleted => "PARENT_DELETED",
            Self::TargetDeleted => "TARGET_DELETED",

            Self::NotTopicAuthor => "NOT_TOPIC_AUTHOR",
            Self::NotNodeAuthor => "NOT_NODE_AUTHOR",

            Self::ReactionAlreadyExists => "REACTION_ALREADY_EXISTS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TopicNotFound(_) | Self::NodeNotFound(_) | Self::UserNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ContentTooLong { .. }
                | Self::ParentOutsideTopic { .. }
                | Self::ParentDeleted
                | Self::TargetDeleted
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotTopicAuthor | Self::NotNodeAuthor)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ReactionAlreadyExists)
    }
}
