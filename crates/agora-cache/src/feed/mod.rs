//! Read-through cache for the discussion read paths

mod feed_cache;
mod keys;

pub use feed_cache::FeedCache;
pub use keys::{FeedKey, KEY_PREFIX};
