//! Service context - dependency container for services
//!
//! Holds the repositories, the optional cache and database pool, and the
//! shared helpers every service needs.

use std::sync::Arc;

use agora_cache::FeedCache;
use agora_common::{DiscussionConfig, JwtService};
use agora_core::{
    NodeRepository, ReactionRepository, Snowflake, SnowflakeGenerator, TopicRepository,
    UserRepository,
};
use agora_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (PostgreSQL or the in-memory store)
/// - The Redis feed cache, when configured
/// - The database pool, when configured, for readiness checks
/// - JWT verification and Snowflake id generation
#[derive(Clone)]
pub struct ServiceContext {
    pool: Option<PgPool>,
    cache: Option<FeedCache>,

    topic_repo: Arc<dyn TopicRepository>,
    node_repo: Arc<dyn NodeRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    user_repo: Arc<dyn UserRepository>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    discussion: DiscussionConfig,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Infrastructure ===

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn cache(&self) -> Option<&FeedCache> {
        self.cache.as_ref()
    }

    /// Drop cached reads a write to `topic_id` may have made stale
    pub async fn invalidate_topic(&self, topic_id: Snowflake) {
        if let Some(cache) = &self.cache {
            cache.invalidate_after_write(topic_id).await;
        }
    }

    // === Repositories ===

    pub fn topic_repo(&self) -> &dyn TopicRepository {
        self.topic_repo.as_ref()
    }

    pub fn node_repo(&self) -> &dyn NodeRepository {
        self.node_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn discussion(&self) -> &DiscussionConfig {
        &self.discussion
    }

    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("cache", &self.cache)
            .field("repositories", &"...")
            .field("discussion", &self.discussion)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    cache: Option<FeedCache>,
    topic_repo: Option<Arc<dyn TopicRepository>>,
    node_repo: Option<Arc<dyn NodeRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    discussion: Option<DiscussionConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn cache(mut self, cache: FeedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use one store for all four repositories
    pub fn store<S>(self, store: S) -> Self
    where
        S: TopicRepository + NodeRepository + ReactionRepository + UserRepository + Clone + 'static,
    {
        self.topic_repo(Arc::new(store.clone()))
            .node_repo(Arc::new(store.clone()))
            .reaction_repo(Arc::new(store.clone()))
            .user_repo(Arc::new(store))
    }

    pub fn topic_repo(mut self, repo: Arc<dyn TopicRepository>) -> Self {
        self.topic_repo = Some(repo);
        self
    }

    pub fn node_repo(mut self, repo: Arc<dyn NodeRepository>) -> Self {
        self.node_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn discussion(mut self, discussion: DiscussionConfig) -> Self {
        self.discussion = Some(discussion);
        self
    }

    /// Build the ServiceContext
    ///
    /// Pool, cache and discussion settings are optional; the generator
    /// defaults to worker 0.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository or the JWT service is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let required = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext {
            pool: self.pool,
            cache: self.cache,
            topic_repo: self.topic_repo.ok_or_else(|| required("topic_repo"))?,
            node_repo: self.node_repo.ok_or_else(|| required("node_repo"))?,
            reaction_repo: self.reaction_repo.ok_or_else(|| required("reaction_repo"))?,
            user_repo: self.user_repo.ok_or_else(|| required("user_repo"))?,
            jwt_service: self.jwt_service.ok_or_else(|| required("jwt_service"))?,
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::new(0))),
            discussion: self.discussion.unwrap_or_default(),
        })
    }
}
