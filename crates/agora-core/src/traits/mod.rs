//! Repository traits (ports) implemented by the storage layer

mod repositories;

pub use repositories::{
    NodeRepository, ReactionRepository, RepoResult, TopicQuery, TopicRepository, UserRepository,
};
