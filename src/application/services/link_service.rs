//! Link creation and lifecycle management.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{LinkState, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::domain::token::{DEFAULT_TOKEN_LENGTH, generate_token, normalize_token, validate_custom_token};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::destination::validate_destination;

/// Service for creating links and moving them between lifecycle states.
///
/// State changes invalidate the cached mapping so that a deactivated link
/// stops resolving once the cache entry is gone, rather than after its TTL.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
}

impl LinkService {
    pub fn new(links: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { links, cache }
    }

    /// Creates an active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the destination or custom token is
    /// invalid, and [`AppError::Conflict`] if the custom token is taken.
    pub async fn create_link(
        &self,
        destination: &str,
        custom_token: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        let destination = validate_destination(destination).map_err(|e| {
            AppError::bad_request("Invalid destination URL", json!({ "reason": e.to_string() }))
        })?;

        let token = match custom_token {
            Some(custom) => {
                let token = validate_custom_token(custom)?;
                if self.links.find_by_token(&token).await?.is_some() {
                    return Err(AppError::conflict(
                        "Token already exists",
                        json!({ "token": token }),
                    ));
                }
                token
            }
            None => self.generate_unique_token().await?,
        };

        let link = self
            .links
            .create(NewShortLink { token, destination })
            .await?;

        info!(token = %link.token, "Created short link");
        Ok(link)
    }

    /// Looks up a link in any state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed or unknown tokens.
    pub async fn get_link(&self, token: &str) -> Result<ShortLink, AppError> {
        let normalized = Self::normalize(token)?;
        self.links
            .find_by_token(&normalized)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "token": normalized })))
    }

    /// Moves a link to `state` and drops its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for malformed or unknown tokens.
    pub async fn set_state(&self, token: &str, state: LinkState) -> Result<(), AppError> {
        let normalized = Self::normalize(token)?;

        if !self.links.set_state(&normalized, state).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "token": normalized }),
            ));
        }

        if let Err(e) = self.cache.invalidate(&normalized).await {
            warn!(token = %normalized, error = %e, "Failed to invalidate cached link");
        }

        info!(token = %normalized, state = %state, "Link state changed");
        Ok(())
    }

    fn normalize(token: &str) -> Result<String, AppError> {
        normalize_token(token)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "token": token })))
    }

    /// Generates a token that is not yet taken, retrying on collision.
    async fn generate_unique_token(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let token = generate_token(DEFAULT_TOKEN_LENGTH);
            if self.links.find_by_token(&token).await?.is_none() {
                return Ok(token);
            }
        }

        Err(AppError::internal(
            "Failed to generate unique token",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService};

    fn service(links: MockLinkRepository, cache: MockCacheService) -> LinkService {
        LinkService::new(Arc::new(links), Arc::new(cache))
    }

    #[tokio::test]
    async fn test_create_with_generated_token() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_token().times(1).returning(|_| Ok(None));
        links
            .expect_create()
            .withf(|new_link| {
                new_link.token.len() == DEFAULT_TOKEN_LENGTH
                    && new_link.destination == "https://example.com/"
            })
            .times(1)
            .returning(|new_link| Ok(ShortLink::active(1, new_link.token, new_link.destination)));

        let link = service(links, MockCacheService::new())
            .create_link("https://EXAMPLE.com", None)
            .await
            .unwrap();

        assert_eq!(link.destination, "https://example.com/");
        assert!(link.is_active());
    }

    #[tokio::test]
    async fn test_create_with_custom_token_is_lowercased() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_token()
            .withf(|token| token == "promo-2025")
            .times(1)
            .returning(|_| Ok(None));
        links
            .expect_create()
            .withf(|new_link| new_link.token == "promo-2025")
            .times(1)
            .returning(|new_link| Ok(ShortLink::active(7, new_link.token, new_link.destination)));

        let link = service(links, MockCacheService::new())
            .create_link("https://example.com/sale", Some("Promo-2025"))
            .await
            .unwrap();

        assert_eq!(link.token, "promo-2025");
    }

    #[tokio::test]
    async fn test_create_custom_token_conflict() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_token()
            .returning(|_| Ok(Some(ShortLink::active(3, "taken", "https://other.com"))));
        links.expect_create().times(0);

        let result = service(links, MockCacheService::new())
            .create_link("https://example.com", Some("taken"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_destination() {
        let mut links = MockLinkRepository::new();
        links.expect_create().times(0);

        let result = service(links, MockCacheService::new())
            .create_link("javascript:alert(1)", None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_generated_token_retries_on_collision() {
        let mut links = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        links
            .expect_find_by_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|t| Ok(Some(ShortLink::active(1, t, "https://a.com"))));
        links
            .expect_find_by_token()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        links
            .expect_create()
            .times(1)
            .returning(|new_link| Ok(ShortLink::active(2, new_link.token, new_link.destination)));

        let result = service(links, MockCacheService::new())
            .create_link("https://example.com", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_deactivate_invalidates_cache() {
        let mut links = MockLinkRepository::new();
        links
            .expect_set_state()
            .withf(|token, state| token == "abc" && *state == LinkState::Inactive)
            .times(1)
            .returning(|_, _| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|token| token == "abc")
            .times(1)
            .returning(|_| Ok(()));

        service(links, cache)
            .set_state("ABC", LinkState::Inactive)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_state_change_survives_cache_failure() {
        let mut links = MockLinkRepository::new();
        links.expect_set_state().returning(|_, _| Ok(true));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .returning(|_| Err(CacheError::OperationError("down".into())));

        assert!(
            service(links, cache)
                .set_state("abc", LinkState::Active)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_set_state_unknown_token() {
        let mut links = MockLinkRepository::new();
        links.expect_set_state().returning(|_, _| Ok(false));
        let mut cache = MockCacheService::new();
        cache.expect_invalidate().times(0);

        let result = service(links, cache)
            .set_state("nope", LinkState::Inactive)
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_link_malformed_token() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_token().times(0);

        let result = service(links, MockCacheService::new())
            .get_link("bad token")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
