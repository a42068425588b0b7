// ── Status fetcher ──
//
// Per-device status retrieval with a type filter and deadline/cancellation
// propagation. Failures are per-device values; the caller decides whether
// to log and move on.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::DeviceApi;
use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceType, StatusReading};

// ── Fetch context ────────────────────────────────────────────────────

/// Deadline and cancellation scope of one trigger (a request or a scrape).
///
/// Every remote call made on behalf of the trigger runs inside
/// [`run`](Self::run), so an expired deadline or a cancelled token aborts
/// the in-flight call and every call still pending.
#[derive(Debug, Clone)]
pub struct FetchContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    pub fn new(cancel: CancellationToken, deadline: Option<Instant>) -> Self {
        Self { cancel, deadline }
    }

    /// No deadline, never cancelled.
    pub fn unbounded() -> Self {
        Self::new(CancellationToken::new(), None)
    }

    pub fn with_timeout(cancel: CancellationToken, timeout: Duration) -> Self {
        Self::new(cancel, Some(Instant::now() + timeout))
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether further remote calls would be refused.
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drive `fut` unless the context ends first.
    pub async fn run<T, F>(&self, device_id: &DeviceId, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Cancelled {
                device_id: device_id.clone(),
            });
        }

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(FetchError::Cancelled {
                device_id: device_id.clone(),
            }),
            () = deadline => Err(FetchError::DeadlineExceeded {
                device_id: device_id.clone(),
            }),
            result = fut => result.map_err(|source| FetchError::Api {
                device_id: device_id.clone(),
                source,
            }),
        }
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::unbounded()
    }
}

// ── Fetch errors ─────────────────────────────────────────────────────

/// Why one device produced no reading.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("device {device_id}: {source}")]
    Api {
        device_id: DeviceId,
        #[source]
        source: CoreError,
    },

    #[error("device {device_id}: deadline exceeded")]
    DeadlineExceeded { device_id: DeviceId },

    #[error("device {device_id}: cancelled")]
    Cancelled { device_id: DeviceId },
}

impl FetchError {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Api { device_id, .. }
            | Self::DeadlineExceeded { device_id }
            | Self::Cancelled { device_id } => device_id,
        }
    }

    /// The context ended; retrying within the same trigger is pointless.
    pub fn is_context_done(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. } | Self::Cancelled { .. })
    }
}

// ── Fetcher ──────────────────────────────────────────────────────────

/// Fetches sensor readings for sensor-capable devices.
#[derive(Clone)]
pub struct StatusFetcher {
    api: Arc<dyn DeviceApi>,
    sensor_types: Arc<HashSet<DeviceType>>,
}

impl StatusFetcher {
    pub fn new(api: Arc<dyn DeviceApi>, sensor_types: impl IntoIterator<Item = DeviceType>) -> Self {
        Self {
            api,
            sensor_types: Arc::new(sensor_types.into_iter().collect()),
        }
    }

    pub fn is_sensor_capable(&self, device_type: &DeviceType) -> bool {
        self.sensor_types.contains(device_type)
    }

    /// Fetch the reading of `device_id`, with no type check.
    pub async fn fetch(
        &self,
        device_id: &DeviceId,
        ctx: &FetchContext,
    ) -> Result<StatusReading, FetchError> {
        debug!(device_id = %device_id, "fetching device status");
        ctx.run(device_id, self.api.device_status(device_id)).await
    }

    /// Fetch the reading of `device` if its type is sensor-capable.
    ///
    /// Returns `Ok(None)` for other types without touching the API.
    pub async fn fetch_device(
        &self,
        device: &Device,
        ctx: &FetchContext,
    ) -> Result<Option<StatusReading>, FetchError> {
        if !self.is_sensor_capable(&device.device_type) {
            return Ok(None);
        }
        self.fetch(&device.id, ctx).await.map(Some)
    }
}

impl std::fmt::Debug for StatusFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusFetcher")
            .field("sensor_types", &self.sensor_types)
            .finish_non_exhaustive()
    }
}
