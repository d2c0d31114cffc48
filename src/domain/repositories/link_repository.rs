//! Repository trait for short link storage.

use crate::domain::entities::{LinkState, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Access to the relational store of short links.
///
/// This is the source of truth for whether a token resolves. Tokens passed in
/// are expected to be normalized already (see [`crate::domain::token`]).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by token, restricted to [`LinkState::Active`] links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by token regardless of state.
    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError>;

    /// Inserts a new active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the token is taken.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Moves a link to `state`. Returns `Ok(false)` if no such token exists.
    async fn set_state(&self, token: &str, state: LinkState) -> Result<bool, AppError>;

    /// Connectivity check used by the health endpoint.
    async fn health_check(&self) -> bool;
}
