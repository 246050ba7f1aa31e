//! Process-local storage
//!
//! Mirrors the PostgreSQL repositories closely enough to run the service layer
//! and the HTTP API without a database: same orderings, same cascades, same
//! uniqueness rules.

mod store;

pub use store::MemoryStore;
