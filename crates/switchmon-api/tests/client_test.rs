// Integration tests for `SwitchBotClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchmon_api::{Credentials, Error, SwitchBotClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SwitchBotClient) {
    let server = MockServer::start().await;
    let client = SwitchBotClient::from_reqwest(
        &server.uri(),
        reqwest::Client::new(),
        Credentials::new("test-token", "test-secret"),
    )
    .unwrap();
    (server, client)
}

fn envelope(body: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": 100, "message": "success", "body": body })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    let body = envelope(json!({
        "deviceList": [
            { "deviceId": "A1", "deviceName": "Living Room", "deviceType": "Hub 2",
              "enableCloudService": true, "hubDeviceId": "" },
            { "deviceId": "B2", "deviceName": "Desk Plug", "deviceType": "Plug Mini (JP)",
              "enableCloudService": true, "hubDeviceId": "A1" }
        ],
        "infraredRemoteList": [
            { "deviceId": "02-abc", "deviceName": "TV", "remoteType": "TV", "hubDeviceId": "A1" }
        ]
    }));

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let list = client.list_devices().await.unwrap();

    assert_eq!(list.device_list.len(), 2);
    assert_eq!(list.device_list[0].device_id, "A1");
    assert_eq!(list.device_list[0].device_name, "Living Room");
    assert_eq!(list.device_list[1].hub_device_id, "A1");
    assert_eq!(list.infrared_remote_list.len(), 1);
    assert_eq!(list.infrared_remote_list[0].remote_type, "TV");
}

#[tokio::test]
async fn test_device_status() {
    let (server, client) = setup().await;

    let body = envelope(json!({
        "deviceId": "A1",
        "deviceType": "Hub 2",
        "hubDeviceId": "A1",
        "temperature": 21.5,
        "humidity": 60,
        "lightLevel": 10,
        "version": "V2.2-1.6"
    }));

    Mock::given(method("GET"))
        .and(path("/v1.1/devices/A1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.device_status("A1").await.unwrap();

    assert_eq!(status.device_id, "A1");
    assert_eq!(status.temperature, Some(21.5));
    assert_eq!(status.humidity, Some(60));
    assert_eq!(status.extra.get("lightLevel"), Some(&json!(10)));
}

#[tokio::test]
async fn test_requests_are_signed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .and(header("authorization", "test-token"))
        .and(header_exists("sign"))
        .and(header_exists("t"))
        .and(header_exists("nonce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let list = client.list_devices().await.unwrap();
    assert!(list.device_list.is_empty());
}

#[tokio::test]
async fn test_device_id_is_path_escaped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices/a%2Fb/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({ "deviceId": "a/b" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let status = client.device_status("a/b").await.unwrap();
    assert_eq!(status.device_id, "a/b");
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_envelope_error_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices/missing/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 152,
            "message": "device not found",
            "body": {}
        })))
        .mount(&server)
        .await;

    let err = client.device_status("missing").await.unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got {err:?}");
    match err {
        Error::Api { status_code, message } => {
            assert_eq!(status_code, 152);
            assert_eq!(message, "device not found");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_rate_limited() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::RateLimited));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build()
        .unwrap();
    let client = SwitchBotClient::from_reqwest(
        &server.uri(),
        http,
        Credentials::new("test-token", "test-secret"),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "deviceList": [] })))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    match client.list_devices().await.unwrap_err() {
        Error::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1.1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    match client.list_devices().await.unwrap_err() {
        Error::Deserialization { body, .. } => assert!(body.contains("maintenance")),
        other => panic!("Expected Deserialization error, got {other:?}"),
    }
}
