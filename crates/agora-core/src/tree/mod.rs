//! Reply tree builder
//!
//! Turns the flat node list of a topic into an ordered forest. Pure and
//! synchronous; callers rebuild the whole forest whenever the list or the sort
//! option changes.

mod builder;
mod reply;
mod sort;

pub use builder::{build_tree, serialize_preorder, TreeNode};
pub use reply::{ReplyAffordance, ReplyDepthPolicy};
pub use sort::{SortOption, Threaded};
