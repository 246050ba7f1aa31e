//! Value objects - immutable types that represent domain concepts

mod counters;
mod deletion;
mod kinds;
mod snowflake;

pub use counters::{ChildTally, NodeCounters, ReactionTally, StanceTally, TopicCounters};
pub use deletion::{DeleteOutcome, DeletionPolicy};
pub use kinds::{NodeType, ParseEnumError, ReactionKind, TopicSort};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
