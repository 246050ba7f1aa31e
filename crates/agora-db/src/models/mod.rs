//! Database models - SQLx-compatible structs for PostgreSQL tables

mod node;
mod reaction;
mod topic;
mod user;

pub use node::{NodeModel, StanceCountModel};
pub use reaction::{ReactionCountModel, ReactionModel};
pub use topic::TopicModel;
pub use user::UserModel;
