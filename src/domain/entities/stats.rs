//! Aggregated click statistics for a single link.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::device::DeviceClass;

/// Clicks recorded on one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClicks {
    pub day: NaiveDate,
    pub clicks: i64,
}

/// Clicks recorded on one weekday, `0` = Sunday through `6` = Saturday (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayClicks {
    pub weekday: i16,
    pub clicks: i64,
}

/// Clicks recorded from one device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceClicks {
    pub device: DeviceClass,
    pub clicks: i64,
}

/// Counter snapshot for a link, as read back from the statistics tables.
///
/// `total` mirrors `links.click_count`; the breakdowns are ordered by day,
/// weekday and descending clicks respectively.
#[derive(Debug, Clone, Serialize)]
pub struct LinkStatistics {
    pub token: String,
    pub total: i64,
    pub daily: Vec<DailyClicks>,
    pub weekdays: Vec<WeekdayClicks>,
    pub devices: Vec<DeviceClicks>,
}

impl LinkStatistics {
    /// Clicks for the given weekday, zero when none were recorded.
    pub fn clicks_on_weekday(&self, weekday: i16) -> i64 {
        self.weekdays
            .iter()
            .find(|w| w.weekday == weekday)
            .map_or(0, |w| w.clicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clicks_on_weekday() {
        let stats = LinkStatistics {
            token: "abc".to_string(),
            total: 5,
            daily: vec![],
            weekdays: vec![
                WeekdayClicks {
                    weekday: 1,
                    clicks: 3,
                },
                WeekdayClicks {
                    weekday: 5,
                    clicks: 2,
                },
            ],
            devices: vec![],
        };

        assert_eq!(stats.clicks_on_weekday(1), 3);
        assert_eq!(stats.clicks_on_weekday(0), 0);
    }
}
