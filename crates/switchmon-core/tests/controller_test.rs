// End-to-end tests: Controller over a real SwitchBotClient against wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchmon_core::metrics::{SampleValue, render_prometheus};
use switchmon_core::{
    Controller, ControllerConfig, CoreError, Credentials, ExpositionOptions, FetchError,
    MeterRegistry,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let mut config = ControllerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        Credentials::new("test-token", "test-secret"),
    );
    config.timeout = Duration::from_secs(2);
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

fn envelope(body: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": 100, "message": "success", "body": body })
}

async fn mount_devices(server: &MockServer) {
    let body = envelope(json!({
        "deviceList": [
            { "deviceId": "A", "deviceName": "Living Room", "deviceType": "Hub 2",
              "enableCloudService": true, "hubDeviceId": "000000000000" },
            { "deviceId": "B", "deviceName": "Desk Plug", "deviceType": "Plug Mini (JP)",
              "enableCloudService": true, "hubDeviceId": "A" },
            { "deviceId": "C", "deviceName": "Balcony", "deviceType": "WoIOSensor",
              "enableCloudService": true, "hubDeviceId": "A" }
        ],
        "infraredRemoteList": []
    }));
    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, id: &str, temperature: f64, humidity: i64) {
    let body = envelope(json!({
        "deviceId": id,
        "deviceType": "Hub 2",
        "temperature": temperature,
        "humidity": humidity
    }));
    Mock::given(method("GET"))
        .and(path(format!("/v1.1/devices/{id}/status")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_then_scrape_renders_sensor_gauges() {
    let (server, controller) = setup().await;
    mount_devices(&server).await;
    mount_status(&server, "A", 21.5, 60).await;
    mount_status(&server, "C", 8.25, 85).await;

    controller.refresh_devices().await.unwrap();
    let mut registry = MeterRegistry::new();
    controller.register_metrics(&mut registry).unwrap();

    let scrape = registry.collect(&controller.fetch_context()).await;
    assert!(scrape.failures.is_empty());
    let temps: Vec<_> = scrape
        .family("temperature")
        .unwrap()
        .samples
        .iter()
        .map(|s| s.value)
        .collect();
    assert_eq!(temps, [SampleValue::F64(21.5), SampleValue::F64(8.25)]);

    let text = render_prometheus(&scrape, &ExpositionOptions::default());
    assert!(text.contains("temperature{id=\"A\",name=\"Living Room\"} 21.5\n"));
    assert!(text.contains("humidity{id=\"C\",name=\"Balcony\"} 85\n"));
    assert!(!text.contains("id=\"B\""));
}

#[tokio::test]
async fn offline_sensor_is_reported_and_siblings_survive() {
    let (server, controller) = setup().await;
    mount_devices(&server).await;
    mount_status(&server, "A", 21.5, 60).await;
    Mock::given(method("GET"))
        .and(path("/v1.1/devices/C/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 161, "message": "device offline", "body": {}
        })))
        .mount(&server)
        .await;

    controller.refresh_devices().await.unwrap();
    let report = controller.sensor_readings(&controller.fetch_context()).await;

    assert_eq!(report.readings.len(), 1);
    assert_eq!(report.readings[0].device.id.as_str(), "A");
    assert_eq!(report.errors.len(), 1);
    let err = report.errors.iter().next().unwrap();
    assert_eq!(err.device_id().as_str(), "C");
    assert!(matches!(
        err,
        FetchError::Api {
            source: CoreError::DeviceOffline { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_directory() {
    let (server, controller) = setup().await;
    mount_devices(&server).await;
    controller.refresh_devices().await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = controller.refresh_devices().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert_eq!(controller.devices_snapshot().len(), 3);
}

#[tokio::test]
async fn slow_status_hits_scrape_deadline() {
    let (server, controller) = setup().await;
    mount_devices(&server).await;
    mount_status(&server, "A", 21.5, 60).await;
    Mock::given(method("GET"))
        .and(path("/v1.1/devices/C/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    controller.refresh_devices().await.unwrap();
    let ctx = controller.fetch_context_with_timeout(Duration::from_millis(500));
    let report = controller.sensor_readings(&ctx).await;

    assert_eq!(report.readings.len(), 1);
    assert!(matches!(
        report.errors.iter().next(),
        Some(FetchError::DeadlineExceeded { .. })
    ));
}

#[tokio::test]
async fn slow_listing_maps_to_timeout() {
    let server = MockServer::start().await;
    let mut config = ControllerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        Credentials::new("test-token", "test-secret"),
    );
    config.timeout = Duration::from_millis(100);
    let controller = Controller::new(config).unwrap();

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "deviceList": [] })))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = controller.refresh_devices().await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout), "got {err:?}");
}
