// ── Directory refresh ──
//
// Calls the list operation and swaps the result in wholesale. On failure the
// previous directory stays in place and the error goes back to the caller;
// retry policy is the caller's business.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::{DeviceDirectory, DirectoryCache};
use crate::api::DeviceApi;
use crate::error::CoreError;
use crate::model::DeviceListing;

impl DirectoryCache {
    /// Fetch a fresh listing and replace the directory with it.
    pub async fn refresh(&self, api: &dyn DeviceApi) -> Result<Arc<DeviceDirectory>, CoreError> {
        let listing = api.list_devices().await?;
        let directory = self.apply_listing(listing);
        debug!(
            devices = directory.devices.len(),
            infrared = directory.infrared.len(),
            "directory refresh complete"
        );
        Ok(directory)
    }

    /// Replace both device lists with `listing`, preserving its order.
    pub(crate) fn apply_listing(&self, listing: DeviceListing) -> Arc<DeviceDirectory> {
        let DeviceListing { devices, infrared } = listing;
        self.store(DeviceDirectory {
            devices: Arc::new(devices.into_iter().map(Arc::new).collect()),
            infrared: Arc::new(infrared.into_iter().map(Arc::new).collect()),
            refreshed_at: Some(Utc::now()),
        })
    }
}
