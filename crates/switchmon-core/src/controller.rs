// ── Controller ──
//
// Owns the directory cache and the sweep pipeline for one account.
// Handles the initial refresh, the optional background refresh task and
// shutdown; HTTP handlers and gauge callbacks go through it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use switchmon_api::{SwitchBotClient, TransportConfig};

use crate::aggregate::{AggregateError, ObservationAggregator, SweepReport};
use crate::api::DeviceApi;
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::fetch::{FetchContext, StatusFetcher};
use crate::metrics::{MeterRegistry, MetricsError, ObservationSink, register_sensor_gauges};
use crate::model::{Device, InfraredDevice};
use crate::store::{DeviceDirectory, DirectoryCache};

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`; clones share one
/// directory cache and one shutdown token.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    api: Arc<dyn DeviceApi>,
    directory: Arc<DirectoryCache>,
    aggregator: ObservationAggregator,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller talking to the SwitchBot API described by
    /// `config`. Makes no requests; call [`start()`](Self::start) for the
    /// initial refresh.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = SwitchBotClient::with_base_url(
            config.api_url.as_str(),
            config.credentials.clone(),
            &transport,
        )?;
        Ok(Self::with_api(config, Arc::new(client)))
    }

    /// Create a controller over any [`DeviceApi`] implementation.
    pub fn with_api(config: ControllerConfig, api: Arc<dyn DeviceApi>) -> Self {
        let fetcher = StatusFetcher::new(Arc::clone(&api), config.sensor_types.iter().cloned());
        Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                directory: Arc::new(DirectoryCache::new()),
                aggregator: ObservationAggregator::new(fetcher),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn directory(&self) -> &Arc<DirectoryCache> {
        &self.inner.directory
    }

    pub fn aggregator(&self) -> &ObservationAggregator {
        &self.inner.aggregator
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.inner.directory.devices_snapshot()
    }

    pub fn infrared_snapshot(&self) -> Arc<Vec<Arc<InfraredDevice>>> {
        self.inner.directory.infrared_snapshot()
    }

    // ── Directory ────────────────────────────────────────────────────

    /// Replace the directory with a fresh listing. On error the previous
    /// directory is kept.
    pub async fn refresh_devices(&self) -> Result<Arc<DeviceDirectory>, CoreError> {
        tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::Cancelled),
            result = self.inner.directory.refresh(self.inner.api.as_ref()) => result,
        }
    }

    // ── Sweeps ───────────────────────────────────────────────────────

    /// A context bounded by the scrape timeout and cancelled on shutdown.
    pub fn fetch_context(&self) -> FetchContext {
        FetchContext::with_timeout(self.inner.cancel.child_token(), self.inner.config.scrape_timeout)
    }

    /// A context cancelled on shutdown, bounded by `timeout`.
    pub fn fetch_context_with_timeout(&self, timeout: Duration) -> FetchContext {
        FetchContext::with_timeout(self.inner.cancel.child_token(), timeout)
    }

    /// Readings of every sensor-capable device in the current directory.
    pub async fn sensor_readings(&self, ctx: &FetchContext) -> SweepReport {
        let devices = self.devices_snapshot();
        self.inner.aggregator.readings(&devices, ctx).await
    }

    pub async fn observe_temperature<S>(
        &self,
        ctx: &FetchContext,
        sink: &mut S,
    ) -> Result<(), AggregateError>
    where
        S: ObservationSink<f64> + ?Sized,
    {
        let devices = self.devices_snapshot();
        self.inner
            .aggregator
            .observe_temperature(&devices, ctx, sink)
            .await
    }

    pub async fn observe_humidity<S>(
        &self,
        ctx: &FetchContext,
        sink: &mut S,
    ) -> Result<(), AggregateError>
    where
        S: ObservationSink<i64> + ?Sized,
    {
        let devices = self.devices_snapshot();
        self.inner
            .aggregator
            .observe_humidity(&devices, ctx, sink)
            .await
    }

    /// Register the temperature and humidity gauges on `registry`.
    pub fn register_metrics(&self, registry: &mut MeterRegistry) -> Result<(), MetricsError> {
        register_sensor_gauges(
            registry,
            Arc::clone(&self.inner.directory),
            self.inner.aggregator.clone(),
        )
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Perform the initial refresh and spawn the background refresh task.
    ///
    /// A failed initial refresh is logged, not returned: the directory
    /// stays empty until a later refresh succeeds.
    pub async fn start(&self) {
        match self.refresh_devices().await {
            Ok(dir) => info!(devices = dir.devices.len(), "initial device refresh complete"),
            Err(e) => warn!(error = %e, "initial device refresh failed"),
        }

        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)));
            debug!(interval_secs, "background refresh started");
        }
    }

    /// Cancel in-flight sweeps and background tasks, then wait for them.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("devices", &self.inner.directory.device_count())
            .finish_non_exhaustive()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodically refresh the directory.
async fn refresh_task(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.refresh_devices().await {
                    warn!(error = %e, "periodic device refresh failed");
                }
            }
        }
    }
}
