//! Device classification of redirect requests from the `User-Agent` header.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use woothee::parser::Parser;

/// Coarse device bucket used for click statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
    Crawler,
    Other,
}

impl DeviceClass {
    /// Classifies a raw `User-Agent` value. A missing header is [`DeviceClass::Other`].
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return Self::Other;
        };

        let Some(result) = Parser::new().parse(ua) else {
            return Self::Other;
        };

        match result.category {
            "crawler" => Self::Crawler,
            "pc" => Self::Desktop,
            "smartphone" | "mobilephone" => {
                // woothee files iPads and Android tablets under "smartphone"
                if result.os == "iPad" || (ua.contains("Android") && !ua.contains("Mobile")) {
                    Self::Tablet
                } else {
                    Self::Mobile
                }
            }
            _ => Self::Other,
        }
    }

    pub fn is_crawler(&self) -> bool {
        *self == Self::Crawler
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Crawler => "crawler",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            "tablet" => Ok(Self::Tablet),
            "crawler" => Ok(Self::Crawler),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown device class '{other}'")),
        }
    }
}
