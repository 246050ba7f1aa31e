//! Entity <-> model mappers
//!
//! - `From<Model> for Entity` where every column maps infallibly
//! - `TryFrom<Model> for Entity` where a text column encodes a closed enum
//! - tally builders folding grouped `COUNT(*)` rows into core tallies

mod node;
mod reaction;
mod topic;
mod user;

use std::str::FromStr;

use agora_core::DomainError;

pub use node::{child_tally, stance_tally};
pub use reaction::reaction_tally;

/// Parse a text column holding an enum value
pub(crate) fn parse_column<T>(column: &'static str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| DomainError::DatabaseError(format!("bad value in {column}: {e}")))
}

/// `COUNT(*)` always fits the counter width in practice; saturate if it ever doesn't
pub(crate) fn narrow_count(count: i64) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
