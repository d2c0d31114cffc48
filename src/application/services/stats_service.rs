//! Read side of click statistics.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::LinkStatistics;
use crate::domain::repositories::StatsRepository;
use crate::domain::token::normalize_token;
use crate::error::AppError;

/// Service for retrieving the aggregated counters of a link.
///
/// Writes do not go through here; they are applied by
/// [`crate::domain::click_worker`].
pub struct StatsService {
    repository: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self { repository }
    }

    /// Retrieves statistics for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed or unknown tokens.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link_statistics(&self, token: &str) -> Result<LinkStatistics, AppError> {
        let normalized = normalize_token(token)
            .ok_or_else(|| AppError::not_found("Statistics not found", json!({ "token": token })))?;

        self.repository
            .get_link_statistics(&normalized)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Statistics not found", json!({ "token": normalized }))
            })
    }
}
