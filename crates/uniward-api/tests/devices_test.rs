#![allow(clippy::unwrap_used)]
// Device listing tests: port tables and MAC bindings, including the
// ordering guarantee (controller-reported order, never re-sorted).

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use uniward_api::{ControllerPlatform, ControllerSession, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_authenticated() -> (MockServer, ControllerSession) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let mut session = ControllerSession::with_client(
        reqwest::Client::new(),
        base_url,
        "default".into(),
        ControllerPlatform::ClassicController,
    );

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    assert!(session.authenticate("admin", &secret).await.unwrap());

    (server, session)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_parses_port_and_mac_tables() {
    let (server, session) = setup_authenticated().await;

    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [{
            "mac": "10:20:30:40:50:60",
            "name": "Switch-24",
            "model": "US24",
            "port_table": [{
                "port_idx": 1,
                "name": "Port 1",
                "mac_table": [{
                    "mac": "aa:bb:cc:dd:ee:01",
                    "ip": "192.168.1.20",
                    "vlan": 10,
                    "uptime": 86400,
                    "is_only_station_on_port": true,
                    "age": 12
                }]
            }]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name.as_deref(), Some("Switch-24"));

    let port = &devices[0].port_table[0];
    assert_eq!(port.port_idx, Some(1));

    let binding = &port.mac_table[0];
    assert_eq!(binding.mac, "aa:bb:cc:dd:ee:01");
    assert_eq!(binding.ip.as_deref(), Some("192.168.1.20"));
    assert_eq!(binding.vlan, Some(10));
    assert_eq!(binding.uptime, Some(86400));
    assert_eq!(binding.is_only_station_on_port, Some(true));
    assert_eq!(binding.age, Some(12));
}

#[tokio::test]
async fn test_list_devices_preserves_controller_order() {
    let (server, session) = setup_authenticated().await;

    // Ports and bindings arrive in a fixed, non-sorted order and must come
    // back exactly as reported.
    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [{
            "mac": "10:20:30:40:50:60",
            "name": "Switch-8",
            "port_table": [
                {
                    "port_idx": 7,
                    "mac_table": [
                        { "mac": "aa:bb:cc:dd:ee:30" },
                        { "mac": "aa:bb:cc:dd:ee:10" },
                        { "mac": "aa:bb:cc:dd:ee:20" }
                    ]
                },
                { "port_idx": 2, "mac_table": [] },
                {
                    "port_idx": 5,
                    "mac_table": [
                        { "mac": "aa:bb:cc:dd:ee:02" },
                        { "mac": "aa:bb:cc:dd:ee:01" }
                    ]
                }
            ]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();

    let port_order: Vec<Option<i32>> =
        devices[0].port_table.iter().map(|p| p.port_idx).collect();
    assert_eq!(port_order, vec![Some(7), Some(2), Some(5)]);

    let macs: Vec<&str> = devices[0].port_table[0]
        .mac_table
        .iter()
        .map(|b| b.mac.as_str())
        .collect();
    assert_eq!(
        macs,
        vec!["aa:bb:cc:dd:ee:30", "aa:bb:cc:dd:ee:10", "aa:bb:cc:dd:ee:20"]
    );

    let macs: Vec<&str> = devices[0].port_table[2]
        .mac_table
        .iter()
        .map(|b| b.mac.as_str())
        .collect();
    assert_eq!(macs, vec!["aa:bb:cc:dd:ee:02", "aa:bb:cc:dd:ee:01"]);
}

#[tokio::test]
async fn test_device_without_port_table_is_valid() {
    let (server, session) = setup_authenticated().await;

    // Access points report no port_table at all.
    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [{
            "mac": "10:20:30:40:50:61",
            "name": "AP-Lobby",
            "model": "U6LR"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert!(devices[0].port_table.is_empty());
}

#[tokio::test]
async fn test_list_devices_envelope_error_aborts_fetch() {
    let (server, session) = setup_authenticated().await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.InvalidObject" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = session.list_devices().await;

    assert!(
        matches!(result, Err(Error::Api { .. })),
        "expected Api error, got: {result:?}"
    );
}
