// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-event delivery to the collection endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use crux_tracker_core::{EnrichedEvent, TrackPayload};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::ConfigStore;
use crate::error::TransportError;

/// Sends one enriched event.
///
/// Implementations must not retry internally; the orchestrator and the
/// delivery queue own all retry decisions.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, event: &EnrichedEvent) -> Result<(), TransportError>;
}

/// Posts events as [`TrackPayload`] JSON to the configured endpoint.
pub struct HttpTransport {
	client: Client,
	config: Arc<ConfigStore>,
}

impl HttpTransport {
	pub fn new(client: Client, config: Arc<ConfigStore>) -> Self {
		Self { client, config }
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, event: &EnrichedEvent) -> Result<(), TransportError> {
		let config = self
			.config
			.get()
			.map_err(|_| TransportError::NotInitialized)?;
		let url = config.endpoint();
		let payload = TrackPayload::from_event(event);

		debug!(event_id = %event.id, url = %url, "Sending event");

		let response = self
			.client
			.post(url)
			.json(&payload)
			.send()
			.await
			.map_err(|e| {
				warn!(event_id = %event.id, error = %e, "Event request failed");
				TransportError::RequestFailed(e)
			})?;

		let status = response.status();
		if status.is_success() {
			info!(event_id = %event.id, status = status.as_u16(), "Event sent successfully");
			return Ok(());
		}

		let body = response.text().await.unwrap_or_default();
		let message = error_message(&body);
		warn!(
			event_id = %event.id,
			status = status.as_u16(),
			message = %message,
			"Collector rejected event"
		);

		Err(TransportError::ServerError {
			status: status.as_u16(),
			message,
		})
	}
}

/// Pulls `message` out of a JSON error body, falling back to the raw body.
fn error_message(body: &str) -> String {
	serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
		.unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_message_prefers_json_message() {
		assert_eq!(
			error_message(r#"{"message":"invalid appId","code":4}"#),
			"invalid appId"
		);
	}

	#[test]
	fn test_error_message_falls_back_to_body() {
		assert_eq!(error_message("  Bad Gateway\n"), "Bad Gateway");
		assert_eq!(error_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
		assert_eq!(error_message(""), "");
	}
}
