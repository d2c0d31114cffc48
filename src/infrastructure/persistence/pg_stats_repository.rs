//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use crate::domain::click_event::ClickEvent;
use crate::domain::device::DeviceClass;
use crate::domain::entities::{DailyClicks, DeviceClicks, LinkStatistics, WeekdayClicks};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for click counters.
///
/// A click touches four rows: the link itself and one row in each of the
/// daily, weekday and device aggregate tables. All four changes go out as a
/// single statement so a click is either fully counted or not at all.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment_click_counters(&self, event: &ClickEvent) -> Result<(), AppError> {
        let counted: Option<i64> = sqlx::query_scalar(
            r#"
            WITH link AS (
                UPDATE links
                SET click_count = click_count + 1
                WHERE token = $1
                RETURNING id
            ),
            daily AS (
                INSERT INTO link_daily_stats (link_id, day, clicks)
                SELECT id, $2, 1 FROM link
                ON CONFLICT (link_id, day)
                DO UPDATE SET clicks = link_daily_stats.clicks + 1
            ),
            weekday AS (
                INSERT INTO link_weekday_stats (link_id, weekday, clicks)
                SELECT id, $3, 1 FROM link
                ON CONFLICT (link_id, weekday)
                DO UPDATE SET clicks = link_weekday_stats.clicks + 1
            ),
            device AS (
                INSERT INTO link_device_stats (link_id, device, clicks)
                SELECT id, $4, 1 FROM link
                ON CONFLICT (link_id, device)
                DO UPDATE SET clicks = link_device_stats.clicks + 1
            )
            SELECT id FROM link
            "#,
        )
        .bind(&event.token)
        .bind(event.day())
        .bind(event.weekday())
        .bind(event.device.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        if counted.is_none() {
            debug!(token = %event.token, "Click for unknown token ignored");
        }

        Ok(())
    }

    async fn get_link_statistics(&self, token: &str) -> Result<Option<LinkStatistics>, AppError> {
        let link: Option<(i64, i64)> =
            sqlx::query_as("SELECT id, click_count FROM links WHERE token = $1")
                .bind(token)
                .fetch_optional(self.pool.as_ref())
                .await?;

        let Some((link_id, total)) = link else {
            return Ok(None);
        };

        let daily: Vec<(NaiveDate, i64)> = sqlx::query_as(
            "SELECT day, clicks FROM link_daily_stats WHERE link_id = $1 ORDER BY day",
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let weekdays: Vec<(i16, i64)> = sqlx::query_as(
            "SELECT weekday, clicks FROM link_weekday_stats WHERE link_id = $1 ORDER BY weekday",
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        let devices: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT device, clicks
            FROM link_device_stats
            WHERE link_id = $1
            ORDER BY clicks DESC, device
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(LinkStatistics {
            token: token.to_string(),
            total,
            daily: daily
                .into_iter()
                .map(|(day, clicks)| DailyClicks { day, clicks })
                .collect(),
            weekdays: weekdays
                .into_iter()
                .map(|(weekday, clicks)| WeekdayClicks { weekday, clicks })
                .collect(),
            devices: devices
                .into_iter()
                .map(|(device, clicks)| DeviceClicks {
                    device: device.parse().unwrap_or(DeviceClass::Other),
                    clicks,
                })
                .collect(),
        }))
    }
}
