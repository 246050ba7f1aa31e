use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use agora_core::Snowflake;

use super::FeedKey;
use crate::pool::RedisPool;

const SCAN_BATCH: usize = 200;

/// JSON read-through cache over a [`RedisPool`].
///
/// Every method is infallible from the caller's point of view: Redis errors
/// are logged and turn into misses.
#[derive(Debug, Clone)]
pub struct FeedCache {
    pool: RedisPool,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(pool: RedisPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether Redis answers a PING
    pub async fn ping(&self) -> bool {
        self.pool.health_check().await.is_ok()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &FeedKey) -> Option<T> {
        match self.pool.get_json(key.as_str()).await {
            Ok(hit) => {
                debug!(key = %key, hit = hit.is_some(), "cache lookup");
                hit
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed");
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &FeedKey, value: &T) {
        let ttl = self.ttl.as_secs().max(1);
        if let Err(e) = self.pool.set_json(key.as_str(), value, ttl).await {
            warn!(key = %key, error = %e, "cache write failed");
        }
    }

    /// Drop the single-topic entry and its node list
    pub async fn invalidate_topic(&self, topic_id: Snowflake) {
        let keys = vec![
            FeedKey::topic(topic_id).as_str().to_string(),
            FeedKey::nodes(topic_id).as_str().to_string(),
        ];
        if let Err(e) = self.pool.delete_many(&keys).await {
            warn!(topic_id = %topic_id, error = %e, "cache invalidation failed");
        }
    }

    /// Drop every feed variant (all sorts, all countries)
    pub async fn invalidate_feeds(&self) {
        let pattern = FeedKey::feed_pattern();
        let keys = match self.pool.scan_keys(&pattern, SCAN_BATCH).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "cache scan failed");
                return;
            }
        };
        match self.pool.delete_many(&keys).await {
            Ok(deleted) => debug!(deleted, "feed cache cleared"),
            Err(e) => warn!(error = %e, "cache invalidation failed"),
        }
    }

    /// Everything a mutation on `topic_id` can make stale
    pub async fn invalidate_after_write(&self, topic_id: Snowflake) {
        self.invalidate_topic(topic_id).await;
        self.invalidate_feeds().await;
    }
}
