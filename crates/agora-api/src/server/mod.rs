//! Server setup and initialization
//!
//! Wires configuration into repositories, the optional cache and the router.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use agora_cache::{FeedCache, RedisPool};
use agora_common::{AppConfig, AppError, JwtService};
use agora_core::SnowflakeGenerator;
use agora_db::{
    create_pool, run_migrations, MemoryStore, PgNodeRepository, PgReactionRepository,
    PgTopicRepository, PgUserRepository, PoolConfig,
};
use agora_service::{ServiceContext, ServiceContextBuilder};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = apply_middleware(
        create_router(),
        &config.cors,
        config.app.env.is_production(),
    );
    router.with_state(state)
}

/// Shared pieces of every context: JWT, ids, discussion settings
fn base_context(config: &AppConfig) -> ServiceContextBuilder {
    ServiceContext::builder()
        .jwt_service(Arc::new(JwtService::new(
            &config.jwt.secret,
            config.jwt.token_expiry,
        )))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .discussion(config.discussion.clone())
}

/// Connect to Redis when configured. A cache that cannot be built is skipped.
fn create_cache(config: &AppConfig) -> Option<FeedCache> {
    let redis = config.redis.as_ref()?;
    match RedisPool::from_config(redis) {
        Ok(pool) => {
            info!("Redis feed cache enabled");
            Some(FeedCache::new(pool, Duration::from_secs(config.cache.ttl_seconds)))
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, running without cache");
            None
        }
    }
}

/// Initialize PostgreSQL-backed dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from_settings(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!("Database migrations applied");
    }

    let mut builder = base_context(&config)
        .pool(pool.clone())
        .topic_repo(Arc::new(PgTopicRepository::new(pool.clone())))
        .node_repo(Arc::new(PgNodeRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
        .user_repo(Arc::new(PgUserRepository::new(pool)));
    if let Some(cache) = create_cache(&config) {
        builder = builder.cache(cache);
    }

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(AppState::new(service_context, config))
}

/// AppState over a fresh in-memory store, without database or cache
pub fn create_memory_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let service_context = base_context(&config)
        .store(MemoryStore::new())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;
    Ok(AppState::new(service_context, config))
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;

    let state = create_app_state(config).await?;
    run_server(create_app(state), addr).await
}
