// ── Device domain types ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, unique device identifier as issued by the SwitchBot cloud.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Device type tag, as reported in the `deviceType` field.
///
/// Unknown tags are preserved verbatim in [`Other`](Self::Other) so new
/// hardware never fails a directory refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Hub,
    HubPlus,
    HubMini,
    Hub2,
    Meter,
    MeterPlus,
    MeterPro,
    WoIOSensor,
    Bot,
    Curtain,
    Plug,
    MotionSensor,
    ContactSensor,
    SmartLock,
    Other(String),
}

impl DeviceType {
    /// The tag as the API spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hub => "Hub",
            Self::HubPlus => "Hub Plus",
            Self::HubMini => "Hub Mini",
            Self::Hub2 => "Hub 2",
            Self::Meter => "Meter",
            Self::MeterPlus => "MeterPlus",
            Self::MeterPro => "MeterPro",
            Self::WoIOSensor => "WoIOSensor",
            Self::Bot => "Bot",
            Self::Curtain => "Curtain",
            Self::Plug => "Plug",
            Self::MotionSensor => "Motion Sensor",
            Self::ContactSensor => "Contact Sensor",
            Self::SmartLock => "Smart Lock",
            Self::Other(tag) => tag,
        }
    }

    /// Types that report temperature and humidity unless configured otherwise:
    /// the hub with a built-in sensor and the indoor/outdoor sensor.
    pub fn default_sensor_types() -> Vec<Self> {
        vec![Self::Hub2, Self::WoIOSensor]
    }
}

impl From<&str> for DeviceType {
    fn from(tag: &str) -> Self {
        match tag {
            "Hub" => Self::Hub,
            "Hub Plus" => Self::HubPlus,
            "Hub Mini" => Self::HubMini,
            "Hub 2" => Self::Hub2,
            "Meter" => Self::Meter,
            "MeterPlus" => Self::MeterPlus,
            "MeterPro" => Self::MeterPro,
            "WoIOSensor" => Self::WoIOSensor,
            "Bot" => Self::Bot,
            "Curtain" => Self::Curtain,
            "Plug" => Self::Plug,
            "Motion Sensor" => Self::MotionSensor,
            "Contact Sensor" => Self::ContactSensor,
            "Smart Lock" => Self::SmartLock,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for DeviceType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<DeviceType> for String {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical device. Immutable once fetched; a refresh replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Hub the device is paired through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<DeviceId>,
    #[serde(default)]
    pub cloud_service_enabled: bool,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_type,
            hub_id: None,
            cloud_service_enabled: true,
        }
    }
}

/// An infrared remote learned by a hub. Carried in the directory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraredDevice {
    pub id: DeviceId,
    pub name: String,
    pub remote_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_id: Option<DeviceId>,
}

/// Result of one list call: both device sequences in API order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceListing {
    pub devices: Vec<Device>,
    pub infrared: Vec<InfraredDevice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_type_round_trips_known_and_unknown_tags() {
        assert_eq!(DeviceType::from("Hub 2"), DeviceType::Hub2);
        assert_eq!(DeviceType::from("WoIOSensor"), DeviceType::WoIOSensor);
        assert_eq!(
            DeviceType::from("WoPlug"),
            DeviceType::Other("WoPlug".into())
        );
        assert_eq!(String::from(DeviceType::Other("Robot Vacuum".into())), "Robot Vacuum");
        assert_eq!(DeviceType::MotionSensor.to_string(), "Motion Sensor");
    }

    #[test]
    fn device_serializes_with_short_field_names() {
        let device = Device::new("X", "Living Room", DeviceType::Hub2);
        let value = serde_json::to_value(&device).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "X",
                "name": "Living Room",
                "type": "Hub 2",
                "cloudServiceEnabled": true
            })
        );
    }
}
