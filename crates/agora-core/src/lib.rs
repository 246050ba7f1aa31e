//! # agora-core
//!
//! Domain layer for the discussion platform: topics, typed reply nodes, reactions,
//! the denormalized counter arithmetic, the reply tree builder and the repository
//! traits the storage layer implements.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod tree;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Node, Promotion, Reaction, ReactionTarget, Topic, User};
pub use error::DomainError;
pub use traits::{
    NodeRepository, ReactionRepository, RepoResult, TopicQuery, TopicRepository, UserRepository,
};
pub use tree::{
    build_tree, serialize_preorder, ReplyAffordance, ReplyDepthPolicy, SortOption, Threaded,
    TreeNode,
};
pub use value_objects::{
    ChildTally, DeleteOutcome, DeletionPolicy, NodeCounters, NodeType, ParseEnumError,
    ReactionKind, ReactionTally, Snowflake, SnowflakeGenerator, SnowflakeParseError, StanceTally,
    TopicCounters, TopicSort,
};
