// switchmon-core: Device directory, status sweeps and gauge observation on top of switchmon-api.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod convert;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{AggregateError, DeviceReading, ObservationAggregator, SweepReport};
pub use api::DeviceApi;
pub use config::{ControllerConfig, Credentials};
pub use controller::Controller;
pub use error::CoreError;
pub use fetch::{FetchContext, FetchError, StatusFetcher};
pub use metrics::{ExpositionOptions, MeterRegistry, Observation, ObservationSink};
pub use store::{DeviceDirectory, DirectoryCache};

pub use model::{Device, DeviceId, DeviceListing, DeviceType, InfraredDevice, StatusReading};
