// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport and accessories using wiremock.

mod common;

use std::time::Duration;

use awtrix_bridge::accessory::{Characteristic, CharacteristicValue, ServiceKind};
use awtrix_bridge::command::{AppCommand, PowerCommand, Query};
use awtrix_bridge::protocol::{HttpClient, HttpConfig, Transport};
use awtrix_bridge::{
    AccessoryRegistry, BridgeConfig, CommandDispatcher, ProtocolError, TelemetryRegistry,
};
use common::MemoryHost;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/api/v3/basics";

fn http_config(server: &MockServer) -> HttpConfig {
    let addr = server.address();
    HttpConfig::new(addr.ip().to_string()).with_port(addr.port())
}

fn bridge_config(server: &MockServer) -> BridgeConfig {
    let addr = server.address();
    BridgeConfig::new(addr.ip().to_string()).with_port(addr.port())
}

async fn mount_json(server: &MockServer, request: serde_json::Value, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

async fn requests_with_body(server: &MockServer, body: &serde_json::Value) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| serde_json::from_slice::<serde_json::Value>(&r.body).ok().as_ref() == Some(body))
        .count()
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn posts_json_and_decodes_reply() {
        let server = MockServer::start().await;
        mount_json(&server, json!({"get": "powerState"}), json!({"powerState": 1})).await;

        let client = http_config(&server).into_client().unwrap();
        let reply = client.send_command(&Query::PowerState).await.unwrap();

        assert_eq!(reply, json!({"powerState": 1}));
    }

    #[tokio::test]
    async fn non_success_status_is_connection_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = http_config(&server).into_client().unwrap();
        let err = client.send_command(&AppCommand::Next).await.unwrap_err();

        match err {
            ProtocolError::ConnectionFailed(message) => {
                assert_eq!(message, "HTTP 500 - Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_text_reply_is_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"app": "pause"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("App switching paused"))
            .mount(&server)
            .await;

        let client = http_config(&server).into_client().unwrap();
        let reply = client.send_command(&AppCommand::Pause).await.unwrap();
        assert_eq!(reply, json!("App switching paused"));

        let dispatcher = CommandDispatcher::new(std::sync::Arc::new(client));
        assert!(dispatcher.pause_app_loop().await.unwrap());
    }

    #[tokio::test]
    async fn empty_reply_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = http_config(&server).into_client().unwrap();
        let reply = client.send_command(&PowerCommand::On).await.unwrap();
        assert!(reply.is_null());
    }

    #[tokio::test]
    async fn slow_device_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = http_config(&server)
            .with_timeout(Duration::from_millis(100))
            .into_client()
            .unwrap();
        let err = client.send_command(&AppCommand::Next).await.unwrap_err();

        assert!(matches!(err, ProtocolError::Timeout(100)));
    }

    #[tokio::test]
    async fn unreachable_device_is_error() {
        let client = HttpClient::new("127.0.0.1:1").unwrap();
        assert!(client.send_command(&Query::Version).await.is_err());
    }
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn telemetry_reaches_sensors_and_information() {
        let server = MockServer::start().await;
        mount_json(
            &server,
            json!({"get": "matrixInfo"}),
            json!({"Temp": 21.34, "Hum": 55.6, "version": "1.2"}),
        )
        .await;

        let host = MemoryHost::new();
        let telemetry = TelemetryRegistry::new();
        let registry = AccessoryRegistry::new(&bridge_config(&server), &host, &telemetry).unwrap();

        let mut updates = registry.cache().subscribe();
        tokio::time::timeout(
            Duration::from_secs(5),
            updates.wait_for(|s| s.temperature().is_some()),
        )
        .await
        .expect("telemetry never arrived")
        .unwrap();

        let temperature = host.service(ServiceKind::TemperatureSensor, None);
        let humidity = host.service(ServiceKind::HumiditySensor, None);
        let information = host.service(ServiceKind::AccessoryInformation, None);

        assert_eq!(
            temperature.read(Characteristic::CurrentTemperature).await,
            CharacteristicValue::Float(21.3)
        );
        assert_eq!(
            humidity.read(Characteristic::CurrentRelativeHumidity).await,
            CharacteristicValue::Float(55.6)
        );
        assert_eq!(
            information.read(Characteristic::FirmwareRevision).await,
            CharacteristicValue::Text("1.2".to_string())
        );
        assert_eq!(
            information.value(Characteristic::Manufacturer),
            Some(CharacteristicValue::Text("Blueforcer".to_string()))
        );
    }

    #[tokio::test]
    async fn empty_poll_keeps_previous_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"get": "matrixInfo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Temp": 20.0})))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_json(&server, json!({"get": "matrixInfo"}), json!({})).await;

        let host = MemoryHost::new();
        let telemetry = TelemetryRegistry::new();
        let config = bridge_config(&server).with_poll_interval(Duration::from_secs(1));
        let registry = AccessoryRegistry::new(&config, &host, &telemetry).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;

        let polls = requests_with_body(&server, &json!({"get": "matrixInfo"})).await;
        assert!(polls >= 2, "expected at least two polls, saw {polls}");
        assert_eq!(registry.cache().read().temperature(), Some(20.0));
    }

    #[tokio::test]
    async fn rejected_power_command_is_absorbed() {
        let server = MockServer::start().await;
        mount_json(&server, json!({"get": "matrixInfo"}), json!({})).await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"power": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"get": "powerState"})))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let host = MemoryHost::new();
        let telemetry = TelemetryRegistry::new();
        let _registry = AccessoryRegistry::new(&bridge_config(&server), &host, &telemetry).unwrap();

        let power = host.service(ServiceKind::Switch, Some("On"));
        power.write(Characteristic::On, true).await;

        assert_eq!(
            power.read(Characteristic::On).await,
            CharacteristicValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn select_key_toggles_timer() {
        let server = MockServer::start().await;
        mount_json(&server, json!({"get": "matrixInfo"}), json!({})).await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"timer": "10m"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_json(json!({"timer": "stop"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let host = MemoryHost::new();
        let telemetry = TelemetryRegistry::new();
        let _registry = AccessoryRegistry::new(&bridge_config(&server), &host, &telemetry).unwrap();

        let remote = host.service(ServiceKind::Television, None);
        remote.write(Characteristic::RemoteKey, 8_i64).await;
        remote.write(Characteristic::RemoteKey, 8_i64).await;
    }

    #[tokio::test]
    async fn momentary_button_reverts_on_real_clock() {
        let server = MockServer::start().await;
        mount_json(&server, json!({"get": "matrixInfo"}), json!({})).await;
        mount_json(&server, json!({"app": "next"}), json!({"success": true})).await;

        let host = MemoryHost::new();
        let telemetry = TelemetryRegistry::new();
        let _registry = AccessoryRegistry::new(&bridge_config(&server), &host, &telemetry).unwrap();

        let next = host.service(ServiceKind::Switch, Some("Next"));
        next.write(Characteristic::On, true).await;
        assert_eq!(next.read(Characteristic::On).await, CharacteristicValue::Bool(true));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(next.read(Characteristic::On).await, CharacteristicValue::Bool(false));
        assert_eq!(
            next.value(Characteristic::On),
            Some(CharacteristicValue::Bool(false))
        );
    }
}
