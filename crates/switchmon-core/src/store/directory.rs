// ── Directory snapshot storage ──
//
// Read-copy-update storage built on `ArcSwap`: readers load an immutable
// `Arc<DeviceDirectory>`, a refresh stores a freshly built one. Nothing is
// ever mutated in place, so iteration and refresh can overlap safely.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::model::{Device, InfraredDevice};

/// One complete device listing, as returned by a single successful refresh.
#[derive(Debug, Clone, Default)]
pub struct DeviceDirectory {
    pub devices: Arc<Vec<Arc<Device>>>,
    pub infrared: Arc<Vec<Arc<InfraredDevice>>>,
    /// When the listing was fetched; `None` until the first refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Process-wide cache of the device directory, owned by the `Controller`.
pub struct DirectoryCache {
    current: ArcSwap<DeviceDirectory>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(DeviceDirectory::default()),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// The whole directory as of the last successful refresh.
    pub fn snapshot(&self) -> Arc<DeviceDirectory> {
        self.current.load_full()
    }

    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        Arc::clone(&self.current.load().devices)
    }

    pub fn infrared_snapshot(&self) -> Arc<Vec<Arc<InfraredDevice>>> {
        Arc::clone(&self.current.load().infrared)
    }

    pub fn device_count(&self) -> usize {
        self.current.load().devices.len()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.current.load().refreshed_at
    }

    /// How long ago the last refresh occurred, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    pub(super) fn store(&self, directory: DeviceDirectory) -> Arc<DeviceDirectory> {
        let directory = Arc::new(directory);
        self.current.store(Arc::clone(&directory));
        directory
    }
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new()
    }
}
