#![allow(dead_code)]

use async_trait::async_trait;
use linkhop::domain::click_event::ClickEvent;
use linkhop::domain::entities::{LinkState, LinkStatistics, NewShortLink, ShortLink};
use linkhop::domain::repositories::{LinkRepository, StatsRepository};
use linkhop::error::AppError;
use linkhop::infrastructure::cache::{CacheError, CacheResult, CacheService};
use linkhop::state::AppState;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub const CACHE_TTL: u64 = 300;

/// Link store kept in a map. `fail` makes every call return a database error.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, ShortLink>>,
    pub lookups: AtomicUsize,
    pub fail: bool,
}

impl InMemoryLinkRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_link(self, token: &str, destination: &str, state: LinkState) -> Self {
        let mut link = ShortLink::active(self.links.lock().unwrap().len() as i64 + 1, token, destination);
        link.state = state;
        self.links.lock().unwrap().insert(token.to_string(), link);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            Err(AppError::internal("Database error", json!({})))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_active_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .get(token)
            .filter(|link| link.is_active())
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ShortLink>, AppError> {
        self.check()?;
        Ok(self.links.lock().unwrap().get(token).cloned())
    }

    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        self.check()?;
        let mut links = self.links.lock().unwrap();
        let link = ShortLink::active(links.len() as i64 + 1, new_link.token, new_link.destination);
        links.insert(link.token.clone(), link.clone());
        Ok(link)
    }

    async fn set_state(&self, token: &str, state: LinkState) -> Result<bool, AppError> {
        self.check()?;
        Ok(match self.links.lock().unwrap().get_mut(token) {
            Some(link) => {
                link.state = state;
                true
            }
            None => false,
        })
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }
}

/// Cache kept in a map. `fail` makes every call return a backend error.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    pub fail: bool,
}

impl InMemoryCache {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_entry(self, token: &str, destination: &str) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(token.to_string(), destination.to_string());
        self
    }

    pub fn peek(&self, token: &str) -> Option<String> {
        self.entries.lock().unwrap().get(token).cloned()
    }

    /// Polls until `token` is cached; repopulation runs on a detached task.
    pub async fn wait_for(&self, token: &str) -> Option<String> {
        for _ in 0..100 {
            if let Some(value) = self.peek(token) {
                return Some(value);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    fn check(&self) -> CacheResult<()> {
        if self.fail {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_url(&self, token: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.peek(token))
    }

    async fn set_url(
        &self,
        token: &str,
        destination: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert(token.to_string(), destination.to_string());
        Ok(())
    }

    async fn invalidate(&self, token: &str) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().unwrap().remove(token);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }
}

/// Statistics sink that records events, or always fails.
#[derive(Default)]
pub struct RecordingStatsRepository {
    pub events: Mutex<Vec<ClickEvent>>,
    pub attempts: AtomicUsize,
    pub fail: bool,
}

impl RecordingStatsRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl StatsRepository for RecordingStatsRepository {
    async fn increment_click_counters(&self, event: &ClickEvent) -> Result<(), AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::internal("Database error", json!({})));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn get_link_statistics(&self, _token: &str) -> Result<Option<LinkStatistics>, AppError> {
        Ok(None)
    }
}

pub fn create_test_state(
    links: Arc<InMemoryLinkRepository>,
    cache: Arc<InMemoryCache>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);
    let state = AppState::new(links, cache, tx, CACHE_TTL);
    (state, rx)
}
