//! Application layer services.
//!
//! Services orchestrate repository and cache calls; handlers and the admin
//! CLI call services, never repositories directly.
//!
//! - [`services::RedirectService`] - token resolution (cache-aside) and click enqueueing
//! - [`services::LinkService`] - link creation and lifecycle changes
//! - [`services::StatsService`] - click statistics read-back

pub mod services;
