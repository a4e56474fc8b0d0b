// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end checks of the reqwest transport against a mock registry.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use status_client::{
    ApiError, LogReporter, Monitor, PollerConfig, ReqwestTransport, ServiceHealth,
    StatusApiClient, TransportError,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> StatusApiClient<ReqwestTransport> {
    let transport = ReqwestTransport::new(&server.uri(), Duration::from_secs(5)).unwrap();
    StatusApiClient::new(transport)
}

#[tokio::test]
async fn list_maps_registry_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"url": "https://a.example.com", "name": "a", "created_at": 1000, "status": "OK"},
            {"url": "https://b.example.com", "name": "b", "created_at": 2000, "status": "FAIL"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server).list().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "a");
    assert_eq!(records[0].created_at.timestamp_millis(), 1000);
    assert_eq!(records[1].name, "b");
    assert_eq!(records[1].created_at.timestamp_millis(), 2000);
    assert_eq!(records[1].status, ServiceHealth::Fail);
}

#[tokio::test]
async fn add_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/service"))
        .and(body_json(json!({"name": "svc1", "url": "https://example.com"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).add("svc1", "https://example.com").await.unwrap());
}

#[tokio::test]
async fn add_rejection_and_failure_are_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"name": "svc1", "url": "bad-url"})))
        .respond_with(ResponseTemplate::new(400).set_body_string("The provided url is invalid"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"name": "svc2", "url": "https://example.com"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("foobar"))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(!client.add("svc1", "bad-url").await.unwrap());

    let err = client.add("svc2", "https://example.com").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Transport(TransportError::Status {
            status: 500,
            body: "foobar".to_string()
        })
    );
}

#[tokio::test]
async fn delete_escapes_name_and_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/service/my%20svc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/service/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.delete("my svc").await.unwrap());
    assert!(!client.delete("ghost").await.unwrap());
}

#[tokio::test]
async fn unreachable_registry_is_network_error() {
    // nothing listens on a port freed by dropping its listener
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let transport = ReqwestTransport::new(&uri, Duration::from_secs(2)).unwrap();
    let err = StatusApiClient::new(transport).list().await.unwrap_err();

    assert!(matches!(err, TransportError::Network { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn monitor_polls_and_refreshes_after_add() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"url": "https://example.com", "name": "svc1", "created_at": 1000, "status": "UNKNOWN"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/service"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let monitor = Monitor::with_transport(
        transport,
        PollerConfig {
            interval: Duration::from_secs(3600),
            fetch_immediately: false,
        },
        Arc::new(LogReporter),
    );
    monitor.start().unwrap();
    assert!(monitor.snapshot().is_none());

    assert!(monitor
        .coordinator()
        .add_service("svc1", "https://example.com")
        .await
        .unwrap());

    let snapshot = monitor.snapshot().unwrap();
    assert_eq!(snapshot.get("svc1").unwrap().status, ServiceHealth::Unknown);

    monitor.shutdown().await;
}
