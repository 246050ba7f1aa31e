//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in agora-core.

mod error;
mod node;
mod reaction;
mod topic;
mod user;

pub use error::like_pattern;
pub use node::PgNodeRepository;
pub use reaction::PgReactionRepository;
pub use topic::PgTopicRepository;
pub use user::PgUserRepository;
