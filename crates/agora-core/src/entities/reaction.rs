//! Reaction entity - a like or dislike on a topic or on one of its nodes

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionKind, Snowflake};

/// What a reaction is attached to. Always scoped to a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Topic,
    Node(Snowflake),
}

impl ReactionTarget {
    pub fn from_node_id(node_id: Option<Snowflake>) -> Self {
        node_id.map_or(Self::Topic, Self::Node)
    }

    pub fn node_id(&self) -> Option<Snowflake> {
        match self {
            Self::Topic => None,
            Self::Node(id) => Some(*id),
        }
    }
}

/// At most one per (user, topic, target)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub topic_id: Snowflake,
    pub target: ReactionTarget,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        topic_id: Snowflake,
        target: ReactionTarget,
        kind: ReactionKind,
    ) -> Self {
        Self {
            id,
            user_id,
            topic_id,
            target,
            kind,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn node_id(&self) -> Option<Snowflake> {
        self.target.node_id()
    }
}
