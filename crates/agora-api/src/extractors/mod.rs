//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and query strings.

mod auth;
mod path;
mod query;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::SnowflakePath;
pub use query::{QueryParams, SearchParams, ThreadParams, TopicFeedParams};
pub use validated::ValidatedJson;
