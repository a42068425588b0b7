// ── Device API capability ──
//
// The two remote operations the pipeline needs, behind a trait so the
// directory, fetcher and aggregator can run against a mock in tests.

use async_trait::async_trait;
use tracing::debug;

use switchmon_api::SwitchBotClient;

pub use switchmon_api::client::DEFAULT_BASE_URL;

use crate::error::CoreError;
use crate::model::{DeviceId, DeviceListing, StatusReading};

/// Remote device API: "list devices" and "get status by id".
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Fetch the physical and infrared device lists, in API order.
    async fn list_devices(&self) -> Result<DeviceListing, CoreError>;

    /// Fetch the current sensor reading of one device.
    async fn device_status(&self, id: &DeviceId) -> Result<StatusReading, CoreError>;
}

#[async_trait]
impl DeviceApi for SwitchBotClient {
    async fn list_devices(&self) -> Result<DeviceListing, CoreError> {
        let raw = SwitchBotClient::list_devices(self).await?;
        debug!(
            devices = raw.device_list.len(),
            infrared = raw.infrared_remote_list.len(),
            "device list received"
        );
        Ok(raw.into())
    }

    async fn device_status(&self, id: &DeviceId) -> Result<StatusReading, CoreError> {
        let mut raw = SwitchBotClient::device_status(self, id.as_str())
            .await
            .map_err(|e| CoreError::for_device(e, id.as_str()))?;
        // Some firmware omits deviceId in the status body.
        if raw.device_id.is_empty() {
            raw.device_id = id.to_string();
        }
        StatusReading::try_from(raw)
    }
}
