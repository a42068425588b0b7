use serde::{Deserialize, Serialize};

use super::device::DeviceId;

/// One sensor reading, produced per fetch and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReading {
    pub device_id: DeviceId,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<i64>,
}
