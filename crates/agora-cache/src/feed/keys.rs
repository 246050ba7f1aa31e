use std::fmt;

use agora_core::{Snowflake, TopicSort};

/// Namespace shared by every key this crate writes
pub const KEY_PREFIX: &str = "agora";

/// Cache key for one read path.
///
/// Feed keys live under `agora:topics:` so they can be dropped together by
/// pattern; single topics and node lists are keyed by topic id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedKey(String);

impl FeedKey {
    /// `agora:topics:{sort}:{country|_all}`
    pub fn feed(sort: TopicSort, country: Option<&str>) -> Self {
        Self(format!("{KEY_PREFIX}:topics:{sort}:{}", country.unwrap_or("_all")))
    }

    pub fn topic(id: Snowflake) -> Self {
        Self(format!("{KEY_PREFIX}:topic:{id}"))
    }

    pub fn nodes(topic_id: Snowflake) -> Self {
        Self(format!("{KEY_PREFIX}:nodes:{topic_id}"))
    }

    /// Glob matching every feed key
    pub fn feed_pattern() -> String {
        format!("{KEY_PREFIX}:topics:*")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
