//! Text and JSON rendering shared by the HTTP handlers and the one-shot
//! commands.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use switchmon_core::{Device, SweepReport};

/// Pretty-printed JSON array of `devices`, in directory order.
///
/// A device that fails to serialize is left out; the rest are still listed.
pub fn device_listing_json(devices: &[Arc<Device>]) -> Result<String, serde_json::Error> {
    let values: Vec<serde_json::Value> = devices
        .iter()
        .filter_map(|device| match serde_json::to_value(&**device) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(device_id = %device.id, error = %e, "skipping device in listing");
                None
            }
        })
        .collect();
    serde_json::to_string_pretty(&values)
}

/// One `id: …, temperature: …, humidity: …` line per reading.
pub fn status_lines(report: &SweepReport) -> String {
    let mut out = String::new();
    for r in &report.readings {
        let _ = writeln!(
            out,
            "id: {}, temperature: {}, humidity: {}",
            r.device.id, r.reading.temperature, r.reading.humidity
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use switchmon_core::{AggregateError, DeviceReading, DeviceType, StatusReading};

    use super::*;

    #[test]
    fn listing_is_a_valid_json_array() {
        let devices = vec![Arc::new(Device::new("X", "Living Room", DeviceType::Hub2))];

        let text = device_listing_json(&devices).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed[0]["id"], "X");
        assert_eq!(parsed[0]["name"], "Living Room");
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn empty_listing() {
        assert_eq!(device_listing_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn status_lines_follow_sweep_order() {
        let reading = |id: &str, t: f64, h: i64| DeviceReading {
            device: Arc::new(Device::new(id, id, DeviceType::Hub2)),
            reading: StatusReading {
                device_id: id.into(),
                temperature: t,
                humidity: h,
                battery: None,
            },
        };
        let report = SweepReport {
            readings: vec![reading("A", 21.5, 60), reading("C", 8.0, 85)],
            errors: AggregateError::new(),
        };

        assert_eq!(
            status_lines(&report),
            "id: A, temperature: 21.5, humidity: 60\nid: C, temperature: 8, humidity: 85\n"
        );
    }
}
