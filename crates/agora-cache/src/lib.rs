//! # agora-cache
//!
//! Optional Redis layer in front of the read paths.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Feed Cache**: read-through JSON entries for topic feeds, single topics and
//!   node lists, invalidated after every mutation
//!
//! Cache failures never fail a request: reads degrade to misses and writes or
//! invalidations are logged and dropped.
//!
//! ## Example
//!
//! ```ignore
//! use agora_cache::{FeedCache, FeedKey, RedisPool};
//!
//! let pool = RedisPool::from_config(&redis_config)?;
//! let cache = FeedCache::new(pool, Duration::from_secs(30));
//!
//! let key = FeedKey::topic(topic_id);
//! if let Some(topic) = cache.get::<TopicResponse>(&key).await {
//!     return Ok(topic);
//! }
//! ```

pub mod feed;
pub mod pool;

pub use feed::{FeedCache, FeedKey, KEY_PREFIX};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
