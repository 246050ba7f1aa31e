//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs (camelCase, ids as strings)
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateNodeRequest, CreateTopicRequest, PromoteNodeRequest, ToggleReactionRequest,
    UpdateNodeRequest, UpdateTopicRequest,
};

pub use responses::{
    AuthorResponse, DeleteResponse, HealthChecks, HealthResponse, NodeResponse, ReactionResponse,
    ReadinessResponse, ThreadResponse, TopicResponse, UserResponse,
};

pub use mappers::{NodeWithAuthor, TopicWithAuthor};
