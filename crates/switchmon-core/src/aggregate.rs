// ── Observation aggregator ──
//
// One sequential sweep over the cached directory. Every sensor-capable
// device is fetched in cache order; successes are handed to the caller,
// failures are logged and joined. One bad device never fails the sweep.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::fetch::{FetchContext, FetchError, StatusFetcher};
use crate::metrics::{ObservationSink, device_attributes};
use crate::model::{Device, DeviceId, StatusReading};

// ── Aggregate error ──────────────────────────────────────────────────

/// Zero or more independent per-device failures from one sweep.
#[derive(Debug, Default)]
pub struct AggregateError {
    errors: Vec<FetchError>,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: FetchError) {
        self.errors.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FetchError> {
        self.errors.iter()
    }

    pub fn failed_devices(&self) -> impl Iterator<Item = &DeviceId> {
        self.errors.iter().map(FetchError::device_id)
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

impl IntoIterator for AggregateError {
    type Item = FetchError;
    type IntoIter = std::vec::IntoIter<FetchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// ── Sweep output ─────────────────────────────────────────────────────

/// A reading together with the device it came from.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReading {
    pub device: Arc<Device>,
    pub reading: StatusReading,
}

/// Everything one sweep produced: partial results plus joined failures.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub readings: Vec<DeviceReading>,
    pub errors: AggregateError,
}

// ── Aggregator ───────────────────────────────────────────────────────

/// Walks a device sequence and turns per-device readings into observations.
///
/// Shared by the metrics gauges and the text status output, so both read
/// paths apply the same filter and failure policy.
#[derive(Debug, Clone)]
pub struct ObservationAggregator {
    fetcher: StatusFetcher,
}

impl ObservationAggregator {
    pub fn new(fetcher: StatusFetcher) -> Self {
        Self { fetcher }
    }

    /// Visit every sensor-capable device that produced a reading.
    ///
    /// Devices are fetched one at a time in slice order. Readings that were
    /// already visited stay visited when a later device fails.
    pub async fn walk<F>(
        &self,
        devices: &[Arc<Device>],
        ctx: &FetchContext,
        mut visit: F,
    ) -> Result<(), AggregateError>
    where
        F: FnMut(&Arc<Device>, StatusReading),
    {
        let mut errors = AggregateError::new();
        for device in devices {
            match self.fetcher.fetch_device(device, ctx).await {
                Ok(Some(reading)) => visit(device, reading),
                Ok(None) => {}
                Err(err) => {
                    info!(device_id = %device.id, error = %err, "failed to get device status");
                    errors.push(err);
                }
            }
        }
        debug!(
            devices = devices.len(),
            failures = errors.len(),
            "device sweep complete"
        );
        errors.into_result()
    }

    /// Emit one observation per reading, using `extract` to pick the metric.
    pub async fn observe<T, S, E>(
        &self,
        devices: &[Arc<Device>],
        ctx: &FetchContext,
        extract: E,
        sink: &mut S,
    ) -> Result<(), AggregateError>
    where
        S: ObservationSink<T> + ?Sized,
        E: Fn(&StatusReading) -> T,
    {
        self.walk(devices, ctx, |device, reading| {
            sink.observe(extract(&reading), device_attributes(device));
        })
        .await
    }

    pub async fn observe_temperature<S>(
        &self,
        devices: &[Arc<Device>],
        ctx: &FetchContext,
        sink: &mut S,
    ) -> Result<(), AggregateError>
    where
        S: ObservationSink<f64> + ?Sized,
    {
        self.observe(devices, ctx, |r| r.temperature, sink).await
    }

    pub async fn observe_humidity<S>(
        &self,
        devices: &[Arc<Device>],
        ctx: &FetchContext,
        sink: &mut S,
    ) -> Result<(), AggregateError>
    where
        S: ObservationSink<i64> + ?Sized,
    {
        self.observe(devices, ctx, |r| r.humidity, sink).await
    }

    /// Collect every reading of one sweep, keeping failures alongside.
    pub async fn readings(&self, devices: &[Arc<Device>], ctx: &FetchContext) -> SweepReport {
        let mut readings = Vec::new();
        let result = self
            .walk(devices, ctx, |device, reading| {
                readings.push(DeviceReading {
                    device: Arc::clone(device),
                    reading,
                });
            })
            .await;
        SweepReport {
            readings,
            errors: result.err().unwrap_or_default(),
        }
    }
}
