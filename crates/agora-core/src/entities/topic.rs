//! Topic entity - a top-level discussion post

use chrono::{DateTime, Utc};

use super::Node;
use crate::value_objects::{Snowflake, TopicCounters};

/// Provenance of a topic created by promoting a reply node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    pub node_id: Snowflake,
    pub topic_id: Snowflake,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: Snowflake,
    pub title: String,
    pub content: String,
    /// `None` once the topic is deleted (or its author is gone)
    pub author_id: Option<Snowflake>,
    pub image_url: Option<String>,
    pub country: Option<String>,
    pub promoted_from: Option<Promotion>,
    pub counters: TopicCounters,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    /// Create a topic with zeroed counters
    pub fn new(id: Snowflake, author_id: Snowflake, title: String, content: String) -> Self {
        Self {
            id,
            title,
            content,
            author_id: Some(author_id),
            image_url: None,
            country: None,
            promoted_from: None,
            counters: TopicCounters::default(),
            is_deleted: false,
            edited_at: None,
            created_at: Utc::now(),
        }
    }

    /// New topic carrying a node's content, authored by whoever promoted it
    pub fn promote(id: Snowflake, promoter_id: Snowflake, title: String, source: &Node) -> Self {
        let mut topic = Self::new(id, promoter_id, title, source.content.clone());
        topic.image_url.clone_from(&source.image_url);
        topic.promoted_from = Some(Promotion {
            node_id: source.id,
            topic_id: source.topic_id,
        });
        topic
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        !self.is_deleted && self.author_id == Some(user_id)
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Apply the provided fields and stamp `edited_at`
    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.edited_at = Some(Utc::now());
    }

    /// Flag deleted and detach the author. Content stays for thread context.
    pub fn tombstone(&mut self) {
        self.is_deleted = true;
        self.author_id = None;
    }

    /// `likeCount + nodeCount * 2`
    pub fn trending_score(&self) -> i64 {
        i64::from(self.counters.like) + i64::from(self.counters.node) * 2
    }

    /// Case-insensitive substring match on title or content
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
    }
}
