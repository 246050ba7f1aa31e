//! Node entity - a typed reply inside a topic's thread

use chrono::{DateTime, Utc};

use crate::value_objects::{NodeCounters, NodeType, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: Snowflake,
    pub topic_id: Snowflake,
    /// `None` for a top-level response directly under the topic
    pub parent_id: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    pub node_type: NodeType,
    pub content: String,
    pub image_url: Option<String>,
    pub counters: NodeCounters,
    pub is_deleted: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Node {
    pub fn new(
        id: Snowflake,
        topic_id: Snowflake,
        parent_id: Option<Snowflake>,
        author_id: Snowflake,
        node_type: NodeType,
        content: String,
    ) -> Self {
        Self {
            id,
            topic_id,
            parent_id,
            author_id: Some(author_id),
            node_type,
            content,
            image_url: None,
            counters: NodeCounters::default(),
            is_deleted: false,
            edited_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        !self.is_deleted && self.author_id == Some(user_id)
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.edited_at = Some(Utc::now());
    }

    /// Flag deleted and detach the author. Replies stay attached.
    pub fn tombstone(&mut self) {
        self.is_deleted = true;
        self.author_id = None;
    }
}
