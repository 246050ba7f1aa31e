//! What "delete" means for topics and nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Always keep the row: flag it deleted and clear the author
    #[default]
    Soft,
    /// Physically remove content nobody engaged with, tombstone the rest
    HardWhenUntouched,
}

impl DeletionPolicy {
    /// Whether an entity with the given engagement should be soft-deleted
    pub fn keeps_row(self, untouched: bool) -> bool {
        match self {
            Self::Soft => true,
            Self::HardWhenUntouched => !untouched,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soft => "soft",
            Self::HardWhenUntouched => "hard_when_untouched",
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionPolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "hard_when_untouched" | "hard-when-untouched" => Ok(Self::HardWhenUntouched),
            other => Err(ParseEnumError {
                kind: "deletion policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Result of a successful delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub soft_deleted: bool,
}

impl DeleteOutcome {
    pub const SOFT: Self = Self { soft_deleted: true };
    pub const HARD: Self = Self {
        soft_deleted: false,
    };
}
