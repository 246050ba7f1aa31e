use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::entities::Node;
use crate::value_objects::{ParseEnumError, Snowflake};

/// Anything that can be placed in a reply tree
pub trait Threaded {
    fn id(&self) -> Snowflake;
    fn parent_id(&self) -> Option<Snowflake>;
    fn like_count(&self) -> i32;
    fn dislike_count(&self) -> i32;
    fn reply_count(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Threaded for Node {
    fn id(&self) -> Snowflake {
        self.id
    }

    fn parent_id(&self) -> Option<Snowflake> {
        self.parent_id
    }

    fn like_count(&self) -> i32 {
        self.counters.like
    }

    fn dislike_count(&self) -> i32 {
        self.counters.dislike
    }

    fn reply_count(&self) -> i32 {
        self.counters.reply
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Sibling ordering, applied independently at every level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Most liked first
    #[default]
    Likes,
    /// Most recent first
    Newest,
    /// Highest `likes + dislikes + replies` first
    Engagement,
}

impl SortOption {
    /// Descending comparator. Ties compare equal so a stable sort keeps input order.
    pub fn compare<T: Threaded>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Likes => b.like_count().cmp(&a.like_count()),
            Self::Newest => b.created_at().cmp(&a.created_at()),
            Self::Engagement => engagement(b).cmp(&engagement(a)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Newest => "newest",
            Self::Engagement => "engagement",
        }
    }
}

fn engagement<T: Threaded>(item: &T) -> i64 {
    i64::from(item.like_count()) + i64::from(item.dislike_count()) + i64::from(item.reply_count())
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(Self::Likes),
            "newest" => Ok(Self::Newest),
            "engagement" => Ok(Self::Engagement),
            other => Err(ParseEnumError {
                kind: "sort option",
                value: other.to_string(),
            }),
        }
    }
}
