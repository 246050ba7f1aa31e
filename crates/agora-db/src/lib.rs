//! # agora-db
//!
//! Storage layer implementing the `agora-core` repository traits.
//!
//! - [`repositories`]: PostgreSQL via SQLx (`FromRow` models, mappers, pool, migrations)
//! - [`memory`]: a process-local store with the same semantics, used by tests and
//!   for running the API without a database
//!
//! ```rust,ignore
//! use agora_db::{create_pool, run_migrations, PgTopicRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::from_settings(&config.database)).await?;
//! run_migrations(&pool).await?;
//! let topics = PgTopicRepository::new(pool);
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgNodeRepository, PgReactionRepository, PgTopicRepository, PgUserRepository,
};
