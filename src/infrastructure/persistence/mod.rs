//! PostgreSQL repository implementations.
//!
//! - [`PgLinkRepository`] - link storage and the active-token lookup
//! - [`PgStatsRepository`] - click counters and their read-back

pub mod pg_link_repository;
pub mod pg_stats_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
