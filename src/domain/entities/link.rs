//! Short link entity and its lifecycle state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a short link.
///
/// Only [`LinkState::Active`] links resolve. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Active,
    Inactive,
}

impl LinkState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown link state '{other}'")),
        }
    }
}

/// A token -> destination mapping.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub token: String,
    pub destination: String,
    pub state: LinkState,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Builds an active link with zero clicks, timestamped now.
    ///
    /// Mostly useful in tests and for freshly inserted rows.
    pub fn active(id: i64, token: impl Into<String>, destination: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            token: token.into(),
            destination: destination.into(),
            state: LinkState::Active,
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == LinkState::Active
    }
}

/// Input data for creating a link. New links start out active.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub token: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_link() {
        let link = ShortLink::active(1, "abc", "https://example.com");

        assert_eq!(link.token, "abc");
        assert_eq!(link.destination, "https://example.com");
        assert_eq!(link.click_count, 0);
        assert!(link.is_active());
    }

    #[test]
    fn test_inactive_link() {
        let mut link = ShortLink::active(1, "abc", "https://example.com");
        link.state = LinkState::Inactive;
        assert!(!link.is_active());
    }

    #[test]
    fn test_state_text_form() {
        assert_eq!(LinkState::Active.to_string(), "active");
        assert_eq!("inactive".parse::<LinkState>(), Ok(LinkState::Inactive));
        assert!("deleted".parse::<LinkState>().is_err());
    }
}
