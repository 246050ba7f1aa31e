//! # agora-service
//!
//! Application layer: the aggregate engine that keeps denormalized counters in
//! step with their rows, the use-case services behind every endpoint, and the
//! request/response DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AuthorResponse, CreateNodeRequest, CreateTopicRequest, DeleteResponse, HealthChecks,
    HealthResponse, NodeResponse, PromoteNodeRequest, ReactionResponse, ReadinessResponse,
    ThreadResponse, ToggleReactionRequest, TopicResponse, UpdateNodeRequest, UpdateTopicRequest,
    UserResponse,
};
pub use services::{
    AggregateService, NodeService, ReactionService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, ThreadService, TopicService, UserService,
};
