//! Background worker that applies click events to the statistics store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::StatsRepository;
use crate::metrics::names;

/// Retries after the first failed write (three attempts in total).
const MAX_RETRIES: usize = 2;

/// Backoff between attempts: 10ms, then 100ms, capped at one second.
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES)
}

/// Consumes click events until every sender is dropped.
///
/// Each event is written on its own task; at most `concurrency` writes are in
/// flight at once. A write that still fails after retrying is logged and
/// counted, never propagated. Before returning, the worker waits for all
/// in-flight writes to finish.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    stats_repository: Arc<dyn StatsRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = stats_repository.clone();
        tokio::spawn(async move {
            let _permit = permit;
            record_with_retry(repository.as_ref(), &event).await;
        });
    }

    // Reacquiring every permit means no write is still running.
    if permits.acquire_many(concurrency as u32).await.is_err() {
        warn!("Click worker semaphore closed during shutdown");
    }
    info!("Click worker stopped");
}

/// Writes one event, retrying transient failures.
///
/// Returns `true` when the counters were updated.
pub async fn record_with_retry(repository: &dyn StatsRepository, event: &ClickEvent) -> bool {
    let result = Retry::start(retry_strategy(), || async move {
        repository.increment_click_counters(event).await.inspect_err(|e| {
            debug!(token = %event.token, error = %e, "Click write attempt failed");
        })
    })
    .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            metrics::counter!(names::CLICK_EVENTS_FAILED_TOTAL).increment(1);
            error!(
                token = %event.token,
                device = %event.device,
                error = %e,
                "Dropping click after {} attempts",
                MAX_RETRIES + 1
            );
            false
        }
    }
}
