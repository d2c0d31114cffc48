//! Infrastructure layer for external integrations.
//!
//! - [`cache`] - Redis and no-op cache implementations
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
