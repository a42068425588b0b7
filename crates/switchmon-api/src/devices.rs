// Device endpoints
//
// Listing (physical + infrared) and per-device status.

use tracing::debug;

use crate::client::SwitchBotClient;
use crate::error::Error;
use crate::models::{DeviceList, DeviceStatus};

impl SwitchBotClient {
    /// List all physical devices and infrared remotes on the account.
    ///
    /// `GET /v1.1/devices`
    pub async fn list_devices(&self) -> Result<DeviceList, Error> {
        let url = self.url("v1.1/devices")?;
        debug!("listing devices");
        self.get(url).await
    }

    /// Get the current status of a single physical device.
    ///
    /// `GET /v1.1/devices/{id}/status`
    pub async fn device_status(&self, device_id: &str) -> Result<DeviceStatus, Error> {
        let mut url = self.url("v1.1/devices/")?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(device_id)
            .push("status");
        debug!(device_id, "fetching device status");
        self.get(url).await
    }
}
