// SwitchBot API response types
//
// All responses are wrapped in the `ApiResponse` envelope. Fields use
// `#[serde(default)]` liberally because the payload differs per device type
// and firmware; everything we don't model lands in `extra`.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard SwitchBot response envelope.
///
/// ```json
/// { "statusCode": 100, "message": "success", "body": { ... } }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub body: serde_json::Value,
}

// ── Device list ──────────────────────────────────────────────────────

/// Body of `GET /v1.1/devices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    #[serde(default)]
    pub device_list: Vec<PhysicalDevice>,
    #[serde(default)]
    pub infrared_remote_list: Vec<InfraredRemote>,
}

/// A physical SwitchBot device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalDevice {
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(default)]
    pub enable_cloud_service: bool,
    #[serde(default)]
    pub hub_device_id: String,
    /// Catch-all for type-specific fields (curtain groups, lock groups, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A virtual infrared remote learned by a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraredRemote {
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub remote_type: String,
    #[serde(default)]
    pub hub_device_id: String,
}

// ── Device status ────────────────────────────────────────────────────

/// Body of `GET /v1.1/devices/{id}/status`.
///
/// Only meters, hubs with a sensor and the outdoor sensor report
/// `temperature`/`humidity`; other types leave them absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub hub_device_id: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<i64>,
    #[serde(default)]
    pub battery: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_list_tolerates_missing_infrared_section() {
        let list: DeviceList = serde_json::from_value(json!({
            "deviceList": [
                { "deviceId": "C271111EC0AB", "deviceName": "Hub 2 1", "deviceType": "Hub 2",
                  "enableCloudService": true, "hubDeviceId": "" }
            ]
        }))
        .unwrap();

        assert_eq!(list.device_list.len(), 1);
        assert!(list.infrared_remote_list.is_empty());
        assert_eq!(list.device_list[0].device_type, "Hub 2");
        assert!(list.device_list[0].enable_cloud_service);
    }

    #[test]
    fn unknown_device_fields_land_in_extra() {
        let dev: PhysicalDevice = serde_json::from_value(json!({
            "deviceId": "D1",
            "deviceName": "Curtain",
            "deviceType": "Curtain",
            "curtainDevicesIds": ["D1", "D2"],
            "master": true
        }))
        .unwrap();

        assert_eq!(dev.extra.get("master"), Some(&json!(true)));
        assert!(dev.extra.contains_key("curtainDevicesIds"));
    }

    #[test]
    fn status_without_sensor_fields_parses() {
        let status: DeviceStatus = serde_json::from_value(json!({
            "deviceId": "P1",
            "deviceType": "Plug",
            "power": "on"
        }))
        .unwrap();

        assert_eq!(status.temperature, None);
        assert_eq!(status.humidity, None);
        assert_eq!(status.extra.get("power"), Some(&json!("on")));
    }
}
