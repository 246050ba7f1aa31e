//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use agora_core::{Node, Reaction, Topic, User};

use super::responses::{AuthorResponse, NodeResponse, ReactionResponse, TopicResponse, UserResponse};

/// Topic joined with its author's profile
#[derive(Debug, Clone)]
pub struct TopicWithAuthor {
    pub topic: Topic,
    pub author: Option<User>,
}

/// Node joined with its author's profile
#[derive(Debug, Clone)]
pub struct NodeWithAuthor {
    pub node: Node,
    pub author: Option<User>,
}

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for AuthorResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
            display_name: user.display_name(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Topic Mappers
// ============================================================================

impl From<TopicWithAuthor> for TopicResponse {
    fn from(joined: TopicWithAuthor) -> Self {
        let TopicWithAuthor { topic, author } = joined;
        // a tombstone never shows who wrote it
        let author = author
            .filter(|user| Some(user.id) == topic.author_id)
            .map(|user| AuthorResponse::from(&user));
        Self {
            id: topic.id,
            title: topic.title,
            content: topic.content,
            author_id: topic.author_id,
            author,
            image_url: topic.image_url,
            country: topic.country,
            promoted_from_node_id: topic.promoted_from.map(|p| p.node_id),
            promoted_from_topic_id: topic.promoted_from.map(|p| p.topic_id),
            agree_count: topic.counters.agree,
            disagree_count: topic.counters.disagree,
            like_count: topic.counters.like,
            dislike_count: topic.counters.dislike,
            node_count: topic.counters.node,
            is_deleted: topic.is_deleted,
            edited_at: topic.edited_at,
            created_at: topic.created_at,
        }
    }
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self::from(TopicWithAuthor { topic, author: None })
    }
}

// ============================================================================
// Node Mappers
// ============================================================================

impl From<NodeWithAuthor> for NodeResponse {
    fn from(joined: NodeWithAuthor) -> Self {
        let NodeWithAuthor { node, author } = joined;
        let author = author
            .filter(|user| Some(user.id) == node.author_id)
            .map(|user| AuthorResponse::from(&user));
        Self {
            id: node.id,
            topic_id: node.topic_id,
            parent_id: node.parent_id,
            author_id: node.author_id,
            author,
            node_type: node.node_type,
            content: node.content,
            image_url: node.image_url,
            agree_count: node.counters.agree,
            disagree_count: node.counters.disagree,
            like_count: node.counters.like,
            dislike_count: node.counters.dislike,
            reply_count: node.counters.reply,
            is_deleted: node.is_deleted,
            edited_at: node.edited_at,
            created_at: node.created_at,
        }
    }
}

impl From<Node> for NodeResponse {
    fn from(node: Node) -> Self {
        Self::from(NodeWithAuthor { node, author: None })
    }
}

// ============================================================================
// Reaction Mappers
// ============================================================================

impl From<&Reaction> for ReactionResponse {
    fn from(reaction: &Reaction) -> Self {
        Self {
            id: reaction.id,
            user_id: reaction.user_id,
            topic_id: reaction.topic_id,
            node_id: reaction.node_id(),
            kind: reaction.kind,
            created_at: reaction.created_at,
        }
    }
}

impl From<Reaction> for ReactionResponse {
    fn from(reaction: Reaction) -> Self {
        Self::from(&reaction)
    }
}
