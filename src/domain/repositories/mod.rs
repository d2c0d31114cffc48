//! Repository traits implemented by the infrastructure layer.
//!
//! - [`LinkRepository`] - the authoritative token -> destination store
//! - [`StatsRepository`] - click counters and their read-back
//!
//! Mocks are generated with `mockall` under `cfg(test)`.

pub mod link_repository;
pub mod stats_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
