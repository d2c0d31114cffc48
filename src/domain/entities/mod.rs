//! Core domain entities.
//!
//! - [`ShortLink`] - a token -> destination mapping with lifecycle state
//! - [`LinkStatistics`] - aggregated click counters for one link
//!
//! Creation inputs use separate `New*` structs, following the same pattern
//! as the persisted entities.

pub mod link;
pub mod stats;

pub use link::{LinkState, NewShortLink, ShortLink};
pub use stats::{DailyClicks, DeviceClicks, LinkStatistics, WeekdayClicks};
