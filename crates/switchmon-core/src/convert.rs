// ── Wire → domain conversions ──
//
// Maps `switchmon-api` response types into the canonical model. Empty hub
// ids become `None`; status payloads missing a sensor field are rejected
// rather than defaulted to zero.

use switchmon_api::models::{DeviceList, DeviceStatus, InfraredRemote, PhysicalDevice};

use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceListing, DeviceType, InfraredDevice, StatusReading};

fn hub_id(raw: String) -> Option<DeviceId> {
    // The API reports "000000000000" or "" for devices without a hub.
    if raw.is_empty() || raw.bytes().all(|b| b == b'0') {
        None
    } else {
        Some(DeviceId::from(raw))
    }
}

impl From<PhysicalDevice> for Device {
    fn from(raw: PhysicalDevice) -> Self {
        Self {
            id: DeviceId::from(raw.device_id),
            name: raw.device_name,
            device_type: DeviceType::from(raw.device_type),
            hub_id: hub_id(raw.hub_device_id),
            cloud_service_enabled: raw.enable_cloud_service,
        }
    }
}

impl From<InfraredRemote> for InfraredDevice {
    fn from(raw: InfraredRemote) -> Self {
        Self {
            id: DeviceId::from(raw.device_id),
            name: raw.device_name,
            remote_type: raw.remote_type,
            hub_id: hub_id(raw.hub_device_id),
        }
    }
}

impl From<DeviceList> for DeviceListing {
    fn from(raw: DeviceList) -> Self {
        Self {
            devices: raw.device_list.into_iter().map(Device::from).collect(),
            infrared: raw
                .infrared_remote_list
                .into_iter()
                .map(InfraredDevice::from)
                .collect(),
        }
    }
}

impl TryFrom<DeviceStatus> for StatusReading {
    type Error = CoreError;

    fn try_from(raw: DeviceStatus) -> Result<Self, Self::Error> {
        let Some(temperature) = raw.temperature else {
            return Err(CoreError::IncompleteReading {
                identifier: raw.device_id,
                field: "temperature",
            });
        };
        let Some(humidity) = raw.humidity else {
            return Err(CoreError::IncompleteReading {
                identifier: raw.device_id,
                field: "humidity",
            });
        };

        Ok(Self {
            device_id: DeviceId::from(raw.device_id),
            temperature,
            humidity,
            battery: raw.battery,
        })
    }
}
