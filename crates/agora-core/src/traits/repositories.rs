//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Tally methods return raw row counts; turning
//! them into stored counters is the aggregate engine's job.

use async_trait::async_trait;

use crate::entities::{Node, Reaction, ReactionTarget, Topic, User};
use crate::error::DomainError;
use crate::value_objects::{
    ChildTally, NodeCounters, ReactionKind, ReactionTally, Snowflake, StanceTally, TopicCounters,
    TopicSort,
};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Topic Repository
// ============================================================================

/// Feed query: live topics only
#[derive(Debug, Clone, Default)]
pub struct TopicQuery {
    pub sort: TopicSort,
    pub country: Option<String>,
    pub limit: i64,
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Find topic by ID, deleted ones included
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Topic>>;

    /// Live topics in feed order
    async fn list(&self, query: &TopicQuery) -> RepoResult<Vec<Topic>>;

    /// Live topics whose title or content contains `needle` (case-insensitive), newest first
    async fn search(&self, needle: &str, limit: i64) -> RepoResult<Vec<Topic>>;

    /// Topics authored by a user, newest first
    async fn find_by_author(&self, author_id: Snowflake) -> RepoResult<Vec<Topic>>;

    async fn create(&self, topic: &Topic) -> RepoResult<()>;

    /// Persist title, content and `edited_at`
    async fn update(&self, topic: &Topic) -> RepoResult<()>;

    /// Flag deleted and clear the author
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Remove the row together with its nodes and reactions
    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Overwrite the denormalized counters
    async fn update_counters(&self, id: Snowflake, counters: &TopicCounters) -> RepoResult<()>;
}

// ============================================================================
// Node Repository
// ============================================================================

#[async_trait]
pub trait NodeRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Node>>;

    /// Every node of a topic, tombstones included, most liked first
    async fn find_by_topic(&self, topic_id: Snowflake) -> RepoResult<Vec<Node>>;

    async fn create(&self, node: &Node) -> RepoResult<()>;

    /// Persist content and `edited_at`
    async fn update(&self, node: &Node) -> RepoResult<()>;

    /// Flag deleted and clear the author
    async fn soft_delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Remove the row and its reactions
    async fn hard_delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Number of node rows under a topic, tombstones included
    async fn count_by_topic(&self, topic_id: Snowflake) -> RepoResult<i64>;

    /// Live nodes of a topic grouped by stance
    async fn tally_by_topic(&self, topic_id: Snowflake) -> RepoResult<StanceTally>;

    /// Direct children of a node
    async fn tally_children(&self, parent_id: Snowflake) -> RepoResult<ChildTally>;

    /// Overwrite the denormalized counters
    async fn update_counters(&self, id: Snowflake, counters: &NodeCounters) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// The user's reaction on a target, if any
    async fn find(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
        target: ReactionTarget,
    ) -> RepoResult<Option<Reaction>>;

    /// Every reaction of a user within a topic (topic-level and node-level)
    async fn find_by_user_in_topic(
        &self,
        user_id: Snowflake,
        topic_id: Snowflake,
    ) -> RepoResult<Vec<Reaction>>;

    async fn create(&self, reaction: &Reaction) -> RepoResult<()>;

    async fn update_kind(&self, id: Snowflake, kind: ReactionKind) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Reactions on one target grouped by kind
    async fn tally(&self, topic_id: Snowflake, target: ReactionTarget) -> RepoResult<ReactionTally>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Batch lookup for embedding authors; missing ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Insert or refresh a profile, keeping the original `created_at`
    async fn upsert(&self, user: &User) -> RepoResult<User>;
}
