//! Domain entities - core business objects

mod node;
mod reaction;
mod topic;
mod user;

pub use node::Node;
pub use reaction::{Reaction, ReactionTarget};
pub use topic::{Promotion, Topic};
pub use user::User;
