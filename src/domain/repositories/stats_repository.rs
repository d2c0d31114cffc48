//! Repository trait for click counters.

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::LinkStatistics;
use crate::error::AppError;
use async_trait::async_trait;

/// Sink and read side for aggregated click statistics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Applies one click: bumps the link's `click_count` and the per-day,
    /// per-weekday and per-device counters.
    ///
    /// Clicks on tokens that no longer exist are dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors. Callers on the
    /// redirect path never see these; the click worker retries and logs them.
    async fn increment_click_counters(&self, event: &ClickEvent) -> Result<(), AppError>;

    /// Reads the counters for one link.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkStatistics))` if the link exists (in any state)
    /// - `Ok(None)` otherwise
    async fn get_link_statistics(&self, token: &str) -> Result<Option<LinkStatistics>, AppError>;
}
