//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod health;
pub mod nodes;
pub mod reactions;
pub mod topics;
pub mod users;
