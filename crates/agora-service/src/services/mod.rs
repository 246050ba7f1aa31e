//! Application services
//!
//! Each service borrows the [`ServiceContext`] and implements one slice of
//! the discussion use cases.

mod aggregate;
mod context;
mod error;
mod node;
mod reaction;
mod thread;
mod topic;
mod user;

pub use aggregate::AggregateService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use node::NodeService;
pub use reaction::ReactionService;
pub use thread::ThreadService;
pub use topic::TopicService;
pub use user::UserService;
