//! Short link resolution: cache-aside read-through with fire-and-forget
//! click counting.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::device::DeviceClass;
use crate::domain::repositories::LinkRepository;
use crate::domain::token::normalize_token;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::metrics::names;

/// Resolves tokens to destination URLs.
///
/// # Request Flow
///
/// 1. Normalize the token; a malformed token is NotFound
/// 2. Check the cache
/// 3. On miss or cache error, query active links in the database and
///    repopulate the cache in the background
/// 4. Enqueue a click event (crawlers excluded) without waiting
/// 5. Return the destination
///
/// The only error callers ever see is [`AppError::NotFound`]. Cache failures
/// and statistics failures are logged and swallowed.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    click_sender: mpsc::Sender<ClickEvent>,
    cache_ttl_seconds: u64,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        Self {
            links,
            cache,
            click_sender,
            cache_ttl_seconds,
        }
    }

    /// Resolves `token` to its destination URL.
    ///
    /// `user_agent` is only used to classify the click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] when the token is malformed, has no
    /// active link, or the database lookup fails.
    pub async fn resolve(&self, token: &str, user_agent: Option<&str>) -> Result<String, AppError> {
        let Some(token) = normalize_token(token) else {
            debug!("Rejected malformed token");
            return Err(Self::not_found(token));
        };

        let destination = match self.cache.get_url(&token).await {
            Ok(Some(destination)) => {
                metrics::counter!(names::REDIRECT_CACHE_HITS_TOTAL).increment(1);
                destination
            }
            Ok(None) => {
                metrics::counter!(names::REDIRECT_CACHE_MISSES_TOTAL).increment(1);
                self.load_and_warm(&token).await?
            }
            Err(e) => {
                metrics::counter!(names::REDIRECT_CACHE_ERRORS_TOTAL).increment(1);
                warn!(token = %token, error = %e, "Cache lookup failed, falling back to database");
                self.load_and_warm(&token).await?
            }
        };

        self.record_click(token, user_agent);

        Ok(destination)
    }

    /// Reads the active link from the database and schedules a cache write.
    async fn load_and_warm(&self, token: &str) -> Result<String, AppError> {
        let link = match self.links.find_active_by_token(token).await {
            Ok(Some(link)) => link,
            Ok(None) => return Err(Self::not_found(token)),
            Err(e) => {
                // Reported as NotFound; callers cannot tell an outage from absence.
                error!(token = %token, error = %e, "Link lookup failed");
                return Err(Self::not_found(token));
            }
        };

        tokio::spawn(repopulate_cache(
            self.links.clone(),
            self.cache.clone(),
            link.token,
            self.cache_ttl_seconds,
        ));

        Ok(link.destination)
    }

    /// Queues a click without waiting. Crawlers are not counted.
    fn record_click(&self, token: String, user_agent: Option<&str>) {
        let device = DeviceClass::from_user_agent(user_agent);
        if device.is_crawler() {
            debug!(token = %token, "Crawler visit not counted");
            return;
        }

        match self.click_sender.try_send(ClickEvent::new(token, device)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                metrics::counter!(names::CLICK_EVENTS_DROPPED_TOTAL).increment(1);
                warn!(token = %event.token, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!(names::CLICK_EVENTS_DROPPED_TOTAL).increment(1);
                error!(token = %event.token, "Click queue closed, dropping click");
            }
        }
    }

    fn not_found(token: &str) -> AppError {
        metrics::counter!(names::REDIRECT_NOT_FOUND_TOTAL).increment(1);
        AppError::not_found("Short link not found", json!({ "token": token }))
    }
}

/// Writes the mapping for `token` back into the cache.
///
/// The link is read again right before the write, so a link deactivated
/// (and evicted) while the redirect was in flight is not put back. A state
/// change landing between this read and the write can still leave a stale
/// entry until its TTL expires.
pub(crate) async fn repopulate_cache(
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    token: String,
    ttl_seconds: u64,
) {
    let link = match links.find_active_by_token(&token).await {
        Ok(Some(link)) => link,
        Ok(None) => {
            debug!(token = %token, "Link no longer active, skipping cache write");
            return;
        }
        Err(e) => {
            warn!(token = %token, error = %e, "Link re-read failed, skipping cache write");
            return;
        }
    };

    if let Err(e) = cache
        .set_url(&link.token, &link.destination, Some(ttl_seconds))
        .await
    {
        warn!(token = %link.token, error = %e, "Failed to repopulate cache");
    }
}
