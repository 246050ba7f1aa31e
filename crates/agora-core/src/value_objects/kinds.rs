//! Closed vocabularies: reply stance, reaction kind and feed ordering

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when a string names no known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($name:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $label,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Stance of a reply node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Agree,
    Disagree,
    Neutral,
}

text_enum!(NodeType, "node type", {
    Agree => "agree",
    Disagree => "disagree",
    Neutral => "neutral",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

text_enum!(ReactionKind, "reaction type", {
    Like => "like",
    Dislike => "dislike",
});

/// Ordering of the topic feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicSort {
    /// Newest first
    #[default]
    Latest,
    /// `likeCount + nodeCount * 2`, highest first
    Trending,
    /// Most liked first
    Top,
}

text_enum!(TopicSort, "topic sort", {
    Latest => "latest",
    Trending => "trending",
    Top => "top",
});
