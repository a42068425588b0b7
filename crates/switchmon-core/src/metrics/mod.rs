//! Pull-based gauge metrics.
//!
//! Gauges are registered with a callback; nothing is sampled until a scrape
//! calls [`MeterRegistry::collect`]. Each callback sweeps the devices anew,
//! so a scrape never reuses readings between gauges.

mod exposition;
mod registry;
mod sensors;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Device;

pub use exposition::{CONTENT_TYPE, ExpositionOptions, render_prometheus, sanitize_name};
pub use registry::{
    Collection, GaugeCallback, GaugeDescriptor, MeterRegistry, MetricFamily, MetricsError, Sample,
    SampleValue, Scrape, ScrapeFailure,
};
pub use sensors::{HUMIDITY_GAUGE, TEMPERATURE_GAUGE, register_sensor_gauges};

/// One label attached to an observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: &'static str,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

pub type Attributes = Vec<KeyValue>;

/// One data point emitted during a scrape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation<T> {
    pub value: T,
    pub attributes: Attributes,
    pub observed_at: DateTime<Utc>,
}

/// Receives observations from a gauge callback.
pub trait ObservationSink<T> {
    fn observe(&mut self, value: T, attributes: Attributes);
}

impl<T> ObservationSink<T> for Vec<Observation<T>> {
    fn observe(&mut self, value: T, attributes: Attributes) {
        self.push(Observation {
            value,
            attributes,
            observed_at: Utc::now(),
        });
    }
}

/// Identity labels of a device: `id` and `name`.
pub fn device_attributes(device: &Device) -> Attributes {
    vec![
        KeyValue::new("id", device.id.as_str()),
        KeyValue::new("name", device.name.as_str()),
    ]
}
