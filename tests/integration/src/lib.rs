//! Integration test utilities for the discussion API
//!
//! Spawns the full axum application on the in-memory store and drives it
//! over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
