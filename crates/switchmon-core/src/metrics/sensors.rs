// ── Sensor gauges ──
//
// The temperature and humidity gauges. Each callback loads the current
// directory snapshot and runs its own aggregator sweep.

use std::sync::Arc;

use super::registry::{Collection, GaugeDescriptor, MeterRegistry, MetricsError};
use super::Observation;
use crate::aggregate::ObservationAggregator;
use crate::store::DirectoryCache;

pub const TEMPERATURE_GAUGE: &str = "temperature";
pub const HUMIDITY_GAUGE: &str = "humidity";

/// Register `temperature` (f64, "C") and `humidity` (i64, "%").
pub fn register_sensor_gauges(
    registry: &mut MeterRegistry,
    directory: Arc<DirectoryCache>,
    aggregator: ObservationAggregator,
) -> Result<(), MetricsError> {
    {
        let directory = Arc::clone(&directory);
        let aggregator = aggregator.clone();
        registry.register_f64_gauge(
            GaugeDescriptor::new(TEMPERATURE_GAUGE, "temperature", "C"),
            move |ctx| {
                let devices = directory.devices_snapshot();
                let aggregator = aggregator.clone();
                async move {
                    let mut observations: Vec<Observation<f64>> = Vec::new();
                    let result = aggregator
                        .observe_temperature(&devices, &ctx, &mut observations)
                        .await;
                    Collection::new(observations, result)
                }
            },
        )?;
    }

    registry.register_i64_gauge(
        GaugeDescriptor::new(HUMIDITY_GAUGE, "humidity", "%"),
        move |ctx| {
            let devices = directory.devices_snapshot();
            let aggregator = aggregator.clone();
            async move {
                let mut observations: Vec<Observation<i64>> = Vec::new();
                let result = aggregator
                    .observe_humidity(&devices, &ctx, &mut observations)
                    .await;
                Collection::new(observations, result)
            }
        },
    )
}
