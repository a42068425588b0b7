// ── Runtime controller configuration ──
//
// Everything a `Controller` needs, assembled by the caller. Core never reads
// files or the environment; switchmon-config builds this from settings.

use std::time::Duration;

use url::Url;

pub use switchmon_api::Credentials;

use crate::model::DeviceType;

/// Configuration for polling one SwitchBot account.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// API base URL (normally `https://api.switch-bot.com`).
    pub api_url: Url,
    /// Open token and secret key.
    pub credentials: Credentials,
    /// Per-request timeout of the HTTP client.
    pub timeout: Duration,
    /// Deadline for one scrape or request-triggered sweep.
    pub scrape_timeout: Duration,
    /// Background directory refresh period (seconds). 0 = on demand only.
    pub refresh_interval_secs: u64,
    /// Device types queried for temperature and humidity.
    pub sensor_types: Vec<DeviceType>,
}

impl ControllerConfig {
    /// Config with default timeouts, no background refresh and the default
    /// sensor-capable types.
    pub fn new(api_url: Url, credentials: Credentials) -> Self {
        Self {
            api_url,
            credentials,
            timeout: Duration::from_secs(10),
            scrape_timeout: Duration::from_secs(20),
            refresh_interval_secs: 0,
            sensor_types: DeviceType::default_sensor_types(),
        }
    }
}
