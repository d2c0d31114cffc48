//! Click event passed from the redirect path to the statistics worker.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::domain::device::DeviceClass;

/// A single counted redirect.
///
/// Not persisted as a row of its own: the worker turns each event into
/// increments of the link's click counter and of its per-day, per-weekday
/// and per-device aggregates.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub token: String,
    pub device: DeviceClass,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event for `token` timestamped now.
    pub fn new(token: impl Into<String>, device: DeviceClass) -> Self {
        Self::at(token, device, Utc::now())
    }

    pub fn at(token: impl Into<String>, device: DeviceClass, occurred_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            device,
            occurred_at,
        }
    }

    /// UTC calendar day bucket.
    pub fn day(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }

    /// Weekday bucket, `0` = Sunday through `6` = Saturday.
    pub fn weekday(&self) -> i16 {
        self.occurred_at.weekday().num_days_from_sunday() as i16
    }
}
