// src/config.rs

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::device::DeviceKind;
use crate::error::GeomarkError;

pub const ENV_API_URL: &str = "GEOMARK_API_URL";
pub const ENV_USER_AGENT: &str = "GEOMARK_DEVICE_UA";
pub const ENV_DEVICE: &str = "GEOMARK_DEVICE";
pub const ENV_TIMEOUT_SECS: &str = "GEOMARK_TIMEOUT_SECS";
pub const ENV_COOKIE: &str = "GEOMARK_COOKIE";
pub const ENV_REQUIRE_MOBILE: &str = "GEOMARK_REQUIRE_MOBILE";

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

// Whole milliseconds, rounded up so a nonzero duration never becomes zero.
fn duration_to_ms(timeout: Duration) -> u64 {
    let nanos = timeout.as_nanos();
    let ms = nanos.div_ceil(1_000_000);
    u64::try_from(ms).unwrap_or(u64::MAX)
}

fn parse_timeout_secs(raw: &str) -> Result<u64, GeomarkError> {
    let invalid = |reason: String| {
        GeomarkError::Config(format!("invalid {} '{}': {}", ENV_TIMEOUT_SECS, raw, reason))
    };
    let secs: f64 = raw.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid("must be a positive number of seconds".to_string()));
    }
    Duration::try_from_secs_f64(secs)
        .map(duration_to_ms)
        .map_err(|e| invalid(e.to_string()))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, GeomarkError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(GeomarkError::Config(format!(
            "invalid {} '{}': expected true/false, yes/no or 1/0",
            name, raw
        ))),
    }
}

/// Settings for an [`AttendanceClient`](crate::AttendanceClient).
///
/// The device kind is part of the configuration; the client never inspects the
/// environment on its own after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the attendance backend, e.g. `https://attendance.example.com`.
    pub api_url: String,
    /// `User-Agent` sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub device: DeviceKind,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Opaque `Cookie` header value carrying an already established session.
    #[serde(default)]
    pub cookie: Option<String>,
    /// Refuse mark-in/mark-out calls unless `device` is mobile.
    #[serde(default)]
    pub require_mobile: bool,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        ClientConfig {
            api_url: api_url.into(),
            user_agent: None,
            device: DeviceKind::Unknown,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cookie: None,
            require_mobile: false,
        }
    }

    /// Sets the user agent and derives the device kind from it.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        self.device = DeviceKind::from_user_agent(&user_agent);
        self.user_agent = Some(user_agent);
        self
    }

    pub fn with_device(mut self, device: DeviceKind) -> Self {
        self.device = device;
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Sets the request timeout. Sub-millisecond remainders round up.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = duration_to_ms(timeout);
        self
    }

    pub fn require_mobile(mut self, require: bool) -> Self {
        self.require_mobile = require;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builds a configuration from `GEOMARK_*` environment variables.
    ///
    /// `GEOMARK_API_URL` is required. `GEOMARK_DEVICE` overrides the kind derived from
    /// `GEOMARK_DEVICE_UA`. `GEOMARK_TIMEOUT_SECS` may be fractional but must be positive.
    /// Malformed values are reported as `GeomarkError::Config`.
    pub fn from_env() -> Result<Self, GeomarkError> {
        let api_url = env::var(ENV_API_URL)
            .map_err(|_| GeomarkError::Config(format!("{} is not set", ENV_API_URL)))?;
        let mut config = ClientConfig::new(api_url);

        if let Ok(user_agent) = env::var(ENV_USER_AGENT) {
            config = config.with_user_agent(user_agent);
        }
        if let Ok(device) = env::var(ENV_DEVICE) {
            config.device = device.parse()?;
        }
        if let Ok(timeout) = env::var(ENV_TIMEOUT_SECS) {
            config.timeout_ms = parse_timeout_secs(&timeout)?;
        }
        if let Ok(cookie) = env::var(ENV_COOKIE) {
            config.cookie = Some(cookie);
        }
        if let Ok(require) = env::var(ENV_REQUIRE_MOBILE) {
            config.require_mobile = parse_flag(ENV_REQUIRE_MOBILE, &require)?;
        }

        log::debug!(
            "Loaded client config from environment: url={}, device={}, timeout={}ms",
            config.api_url,
            config.device,
            config.timeout_ms
        );
        Ok(config)
    }
}
