//! Shared state injected into HTTP handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::RedirectService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Application state cloned into every request.
///
/// The repository, cache and click sender are also held by
/// [`RedirectService`]; they are exposed here for the health check.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub link_repository: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Wires the redirect service from its collaborators.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        cache_ttl_seconds: u64,
    ) -> Self {
        let redirect_service = Arc::new(RedirectService::new(
            link_repository.clone(),
            cache.clone(),
            click_sender.clone(),
            cache_ttl_seconds,
        ));

        Self {
            redirect_service,
            link_repository,
            cache,
            click_sender,
        }
    }
}
