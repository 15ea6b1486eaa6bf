// src/device.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::GeomarkError;

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Mobi|Android|iPhone|iPad|iPod").expect("valid regex"))
}

fn desktop_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)Windows|Macintosh|Linux").expect("valid regex"))
}

/// The class of device a request originates from.
///
/// Marking attendance is only permitted from mobile devices, so the kind is passed
/// around explicitly rather than sniffed from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Mobile,
    Desktop,
    #[default]
    Unknown,
}

impl DeviceKind {
    /// Classifies a `User-Agent` header value.
    ///
    /// Mobile markers are checked first, since Android agents also mention Linux.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if mobile_pattern().is_match(user_agent) {
            DeviceKind::Mobile
        } else if desktop_pattern().is_match(user_agent) {
            DeviceKind::Desktop
        } else {
            DeviceKind::Unknown
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceKind::Mobile
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Mobile => "mobile",
            DeviceKind::Desktop => "desktop",
            DeviceKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = GeomarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(DeviceKind::Mobile),
            "desktop" => Ok(DeviceKind::Desktop),
            "unknown" => Ok(DeviceKind::Unknown),
            other => Err(GeomarkError::Config(format!(
                "unrecognized device kind '{}'",
                other
            ))),
        }
    }
}
