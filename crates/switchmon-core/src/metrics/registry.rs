// ── Gauge registry ──
//
// Gauges are registered once at startup and collected on every scrape.
// A callback reports its observations plus the per-device failures of its
// sweep; a scrape with failures still returns every observation it got.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Attributes, Observation};
use crate::aggregate::AggregateError;
use crate::fetch::FetchContext;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("gauge {name:?} is already registered")]
    DuplicateGauge { name: String },

    #[error("invalid metric name {name:?}: must match [a-zA-Z_:][a-zA-Z0-9_:]*")]
    InvalidName { name: String },
}

/// Name and metadata of a gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeDescriptor {
    pub name: String,
    pub description: String,
    pub unit: String,
}

impl GaugeDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit: unit.into(),
        }
    }
}

/// What one callback invocation produced.
#[derive(Debug)]
pub struct Collection<T> {
    pub observations: Vec<Observation<T>>,
    pub error: Option<AggregateError>,
}

impl<T> Collection<T> {
    pub fn new(observations: Vec<Observation<T>>, result: Result<(), AggregateError>) -> Self {
        Self {
            observations,
            error: result.err(),
        }
    }
}

pub type GaugeCallback<T> =
    Arc<dyn Fn(FetchContext) -> BoxFuture<'static, Collection<T>> + Send + Sync>;

enum Callback {
    F64(GaugeCallback<f64>),
    I64(GaugeCallback<i64>),
}

struct Gauge {
    descriptor: GaugeDescriptor,
    callback: Callback,
}

// ── Scrape output ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    F64(f64),
    I64(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub attributes: Attributes,
    pub value: SampleValue,
    pub observed_at: DateTime<Utc>,
}

/// All samples of one gauge from one scrape.
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub descriptor: GaugeDescriptor,
    pub samples: Vec<Sample>,
}

/// Per-device failures reported by one gauge callback.
#[derive(Debug)]
pub struct ScrapeFailure {
    pub gauge: String,
    pub error: AggregateError,
}

#[derive(Debug, Default)]
pub struct Scrape {
    pub families: Vec<MetricFamily>,
    pub failures: Vec<ScrapeFailure>,
}

impl Scrape {
    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.iter().find(|f| f.descriptor.name == name)
    }
}

fn to_samples<T>(observations: Vec<Observation<T>>, wrap: fn(T) -> SampleValue) -> Vec<Sample> {
    observations
        .into_iter()
        .map(|o| Sample {
            attributes: o.attributes,
            value: wrap(o.value),
            observed_at: o.observed_at,
        })
        .collect()
}

// ── Registry ─────────────────────────────────────────────────────────

/// Callback-driven gauges, collected in registration order.
#[derive(Default)]
pub struct MeterRegistry {
    gauges: Vec<Gauge>,
}

impl MeterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_f64_gauge<F, Fut>(
        &mut self,
        descriptor: GaugeDescriptor,
        callback: F,
    ) -> Result<(), MetricsError>
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Collection<f64>> + Send + 'static,
    {
        let callback: GaugeCallback<f64> = Arc::new(move |ctx| Box::pin(callback(ctx)));
        self.register(descriptor, Callback::F64(callback))
    }

    pub fn register_i64_gauge<F, Fut>(
        &mut self,
        descriptor: GaugeDescriptor,
        callback: F,
    ) -> Result<(), MetricsError>
    where
        F: Fn(FetchContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Collection<i64>> + Send + 'static,
    {
        let callback: GaugeCallback<i64> = Arc::new(move |ctx| Box::pin(callback(ctx)));
        self.register(descriptor, Callback::I64(callback))
    }

    fn register(&mut self, descriptor: GaugeDescriptor, callback: Callback) -> Result<(), MetricsError> {
        if !is_valid_metric_name(&descriptor.name) {
            return Err(MetricsError::InvalidName {
                name: descriptor.name,
            });
        }
        if self.gauges.iter().any(|g| g.descriptor.name == descriptor.name) {
            return Err(MetricsError::DuplicateGauge {
                name: descriptor.name,
            });
        }
        debug!(gauge = %descriptor.name, unit = %descriptor.unit, "gauge registered");
        self.gauges.push(Gauge {
            descriptor,
            callback,
        });
        Ok(())
    }

    pub fn gauge_names(&self) -> impl Iterator<Item = &str> {
        self.gauges.iter().map(|g| g.descriptor.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Invoke every callback once, in registration order.
    pub async fn collect(&self, ctx: &FetchContext) -> Scrape {
        let mut scrape = Scrape::default();
        for gauge in &self.gauges {
            let (samples, error) = match &gauge.callback {
                Callback::F64(cb) => {
                    let c = cb(ctx.clone()).await;
                    (to_samples(c.observations, SampleValue::F64), c.error)
                }
                Callback::I64(cb) => {
                    let c = cb(ctx.clone()).await;
                    (to_samples(c.observations, SampleValue::I64), c.error)
                }
            };
            let name = &gauge.descriptor.name;
            if let Some(error) = error {
                warn!(
                    gauge = %name,
                    failures = error.len(),
                    samples = samples.len(),
                    "gauge collected with device failures"
                );
                scrape.failures.push(ScrapeFailure {
                    gauge: name.clone(),
                    error,
                });
            }
            scrape.families.push(MetricFamily {
                descriptor: gauge.descriptor.clone(),
                samples,
            });
        }
        scrape
    }
}

impl std::fmt::Debug for MeterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeterRegistry")
            .field("gauges", &self.gauge_names().collect::<Vec<_>>())
            .finish()
    }
}

pub(super) fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
