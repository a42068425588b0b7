// In-memory `DeviceApi` for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::DeviceApi;
use crate::error::CoreError;
use crate::model::{DeviceId, DeviceListing, StatusReading};

pub(crate) fn reading(id: &str, temperature: f64, humidity: i64) -> StatusReading {
    StatusReading {
        device_id: DeviceId::from(id),
        temperature,
        humidity,
        battery: None,
    }
}

/// Records every call. Unknown device ids answer "not found".
#[derive(Default)]
pub(crate) struct MockDeviceApi {
    listing: Mutex<Option<DeviceListing>>,
    listing_error: Mutex<Option<String>>,
    statuses: Mutex<HashMap<DeviceId, StatusReading>>,
    offline: Mutex<Vec<DeviceId>>,
    status_calls: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
    latency: Option<Duration>,
}

impl MockDeviceApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_listing(self, listing: DeviceListing) -> Self {
        self.set_listing(listing);
        self
    }

    pub(crate) fn with_status(self, reading: StatusReading) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(reading.device_id.clone(), reading);
        self
    }

    pub(crate) fn with_offline(self, id: &str) -> Self {
        self.offline.lock().unwrap().push(DeviceId::from(id));
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn set_listing(&self, listing: DeviceListing) {
        *self.listing.lock().unwrap() = Some(listing);
        *self.listing_error.lock().unwrap() = None;
    }

    pub(crate) fn fail_listing(&self, message: &str) {
        *self.listing_error.lock().unwrap() = Some(message.to_owned());
    }

    pub(crate) fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceApi for MockDeviceApi {
    async fn list_devices(&self) -> Result<DeviceListing, CoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(message) = self.listing_error.lock().unwrap().clone() {
            return Err(CoreError::Api {
                message,
                code: None,
                status: Some(503),
            });
        }
        Ok(self.listing.lock().unwrap().clone().unwrap_or_default())
    }

    async fn device_status(&self, id: &DeviceId) -> Result<StatusReading, CoreError> {
        self.status_calls.lock().unwrap().push(id.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.lock().unwrap().contains(id) {
            return Err(CoreError::DeviceOffline {
                identifier: id.to_string(),
                message: "device offline".into(),
            });
        }
        self.statuses
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_string(),
            })
    }
}
