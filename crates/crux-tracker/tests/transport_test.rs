// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP transport against a mock collector.

use std::sync::Arc;
use std::time::Duration;

use crux_tracker::{
	ConfigStore, EnrichedEvent, EventData, HttpTransport, InitConfig, Tracker, Transport,
	TransportError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_event(config: &InitConfig) -> EnrichedEvent {
	let data = EventData::new()
		.with_user_id("user_7")
		.insert("button", "buy");
	EnrichedEvent::enrich_at(config, "click", data, 1_700_000_000_123, "Europe/Paris").unwrap()
}

fn transport_for(endpoint: &str) -> (HttpTransport, Arc<ConfigStore>, InitConfig) {
	let store = Arc::new(ConfigStore::new());
	let config = store
		.init(InitConfig::new("app_http").with_api_endpoint(endpoint))
		.unwrap();
	let client = crux_common_http::builder()
		.timeout(Duration::from_secs(5))
		.build()
		.unwrap();
	(HttpTransport::new(client, Arc::clone(&store)), store, config)
}

#[tokio::test]
async fn posts_fixed_key_payload() {
	let server = MockServer::start().await;
	let (transport, _store, config) = transport_for(&format!("{}/api/v1/events", server.uri()));
	let event = sample_event(&config);

	Mock::given(method("POST"))
		.and(path("/api/v1/events"))
		.and(body_partial_json(json!({
			"aid": "app_http",
			"eid": event.id.to_string(),
			"uid": "user_7",
			"dtm": 1_700_000_000_123i64,
			"tz": "Europe/Paris",
			"p": "node",
			"e": "click",
			"tv": "for-audienz",
			"ev": { "button": "buy", "userId": "user_7" }
		})))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;

	transport.send(&event).await.unwrap();
}

#[tokio::test]
async fn sends_sdk_user_agent() {
	let server = MockServer::start().await;
	let (transport, _store, config) = transport_for(&format!("{}/events", server.uri()));

	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(202))
		.mount(&server)
		.await;

	transport.send(&sample_event(&config)).await.unwrap();

	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests.len(), 1);
	let user_agent = requests[0]
		.headers
		.get("user-agent")
		.unwrap()
		.to_str()
		.unwrap();
	assert!(user_agent.starts_with("crux-tracker/"));
}

#[tokio::test]
async fn non_success_status_is_server_error() {
	let server = MockServer::start().await;
	let (transport, _store, config) = transport_for(&format!("{}/events", server.uri()));

	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
		.mount(&server)
		.await;

	let err = transport.send(&sample_event(&config)).await.unwrap_err();
	match err {
		TransportError::ServerError { status, message } => {
			assert_eq!(status, 500);
			assert_eq!(message, "db down");
		}
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn redirect_class_status_is_failure() {
	let server = MockServer::start().await;
	let (transport, _store, config) = transport_for(&format!("{}/events", server.uri()));

	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(304))
		.mount(&server)
		.await;

	let err = transport.send(&sample_event(&config)).await.unwrap_err();
	assert_eq!(err.status(), Some(304));
}

#[tokio::test]
async fn connection_failure_is_request_failed() {
	let (transport, _store, config) = transport_for("http://127.0.0.1:1/events");

	let err = transport.send(&sample_event(&config)).await.unwrap_err();
	assert!(matches!(err, TransportError::RequestFailed(_)));
}

#[tokio::test]
async fn uninitialized_store_is_not_initialized() {
	let store = Arc::new(ConfigStore::new());
	let transport = HttpTransport::new(crux_common_http::new_client().unwrap(), store);
	let config = InitConfig::new("app").validate().unwrap();

	let err = transport.send(&sample_event(&config)).await.unwrap_err();
	assert!(matches!(err, TransportError::NotInitialized));
}

#[tokio::test]
async fn endpoint_is_read_on_every_send() {
	let first = MockServer::start().await;
	let second = MockServer::start().await;
	for server in [&first, &second] {
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(server)
			.await;
	}

	let (transport, store, config) = transport_for(&format!("{}/events", first.uri()));
	transport.send(&sample_event(&config)).await.unwrap();

	store
		.init(InitConfig::new("app_http").with_api_endpoint(format!("{}/events", second.uri())))
		.unwrap();
	transport.send(&sample_event(&config)).await.unwrap();
}

#[tokio::test]
async fn tracker_queues_event_when_collector_fails() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(503))
		.expect(1)
		.mount(&server)
		.await;

	let tracker = Tracker::builder()
		.init_config(InitConfig::new("app_http").with_api_endpoint(format!("{}/events", server.uri())))
		.request_timeout(Duration::from_secs(5))
		.build()
		.unwrap();

	let event = tracker
		.track("click", EventData::new().with_user_id("user_7"))
		.await
		.unwrap();

	assert_eq!(tracker.queue_size(), 1);
	assert_eq!(tracker.queue().snapshot()[0].event.id, event.id);
	tracker.shutdown();
	assert_eq!(tracker.queue_size(), 0);
}

#[tokio::test]
async fn tracker_delivers_when_collector_accepts() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/events"))
		.respond_with(ResponseTemplate::new(201))
		.expect(1)
		.mount(&server)
		.await;

	let tracker = Tracker::new().unwrap();
	tracker
		.init(InitConfig::new("app_http").with_api_endpoint(format!("{}/events", server.uri())))
		.unwrap();

	tracker
		.track("click", EventData::new().with_user_id("user_7"))
		.await
		.unwrap();

	assert_eq!(tracker.queue_size(), 0);
	assert!(!tracker.queue().is_scheduler_running());
}
