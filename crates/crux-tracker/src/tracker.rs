// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Public tracker client: initialization, validation and immediate send.

use std::sync::Arc;
use std::time::Duration;

use crux_tracker_core::{EnrichedEvent, EventData, InitConfig};
use tracing::{debug, warn};

use crate::config::ConfigStore;
use crate::error::{Result, TrackerError};
use crate::observer::{DeliveryObserver, NoOpDeliveryObserver, SharedDeliveryObserver};
use crate::queue::DeliveryQueue;
use crate::transport::{HttpTransport, Transport};

/// Construction-time settings for the tracker.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Timeout for a single HTTP send.
	pub request_timeout: Duration,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
		}
	}
}

/// Builder for constructing a [`Tracker`].
pub struct TrackerBuilder {
	init: Option<InitConfig>,
	transport: Option<Arc<dyn Transport>>,
	observer: Option<SharedDeliveryObserver>,
	config: ClientConfig,
}

impl TrackerBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			init: None,
			transport: None,
			observer: None,
			config: ClientConfig::default(),
		}
	}

	/// Initializes the tracker as part of `build`.
	pub fn init_config(mut self, config: InitConfig) -> Self {
		self.init = Some(config);
		self
	}

	/// Replaces the HTTP transport.
	pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
		self.transport = Some(Arc::new(transport));
		self
	}

	/// Replaces the HTTP transport with a shared one.
	pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Sets the observer notified of queued delivery outcomes.
	pub fn delivery_observer<O: DeliveryObserver + 'static>(mut self, observer: O) -> Self {
		self.observer = Some(Arc::new(observer));
		self
	}

	/// Sets the observer from an existing shared handle.
	pub fn shared_delivery_observer(mut self, observer: SharedDeliveryObserver) -> Self {
		self.observer = Some(observer);
		self
	}

	/// Sets the HTTP request timeout. Ignored with a custom transport.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Builds the tracker.
	pub fn build(self) -> Result<Tracker> {
		let config_store = Arc::new(ConfigStore::new());
		if let Some(init) = self.init {
			config_store.init(init)?;
		}

		let transport = match self.transport {
			Some(transport) => transport,
			None => {
				let http_client = crux_common_http::builder()
					.timeout(self.config.request_timeout)
					.build()
					.map_err(TrackerError::HttpClient)?;
				Arc::new(HttpTransport::new(http_client, Arc::clone(&config_store)))
			}
		};

		let observer = self
			.observer
			.unwrap_or_else(|| Arc::new(NoOpDeliveryObserver));
		let queue = DeliveryQueue::with_observer(Arc::clone(&transport), observer);

		Ok(Tracker {
			inner: Arc::new(TrackerInner {
				config: config_store,
				transport,
				queue,
				client_config: self.config,
			}),
		})
	}
}

impl Default for TrackerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct TrackerInner {
	config: Arc<ConfigStore>,
	transport: Arc<dyn Transport>,
	queue: DeliveryQueue,
	client_config: ClientConfig,
}

/// Event tracking client.
///
/// `track` only fails for configuration and validation problems. Transport
/// failures are absorbed: the event moves to the retry queue and `track`
/// returns `Ok`.
///
/// # Example
///
/// ```ignore
/// use crux_tracker::{EventData, InitConfig, Tracker};
///
/// let tracker = Tracker::new()?;
/// tracker.init(InitConfig::new("my_app"))?;
///
/// tracker
///     .track("checkout", EventData::new().with_user_id("user_42").insert("total", 99.5))
///     .await?;
///
/// // Drop anything still waiting for a retry.
/// tracker.shutdown();
/// ```
#[derive(Clone)]
pub struct Tracker {
	inner: Arc<TrackerInner>,
}

impl Tracker {
	/// Creates a new builder for constructing a Tracker.
	pub fn builder() -> TrackerBuilder {
		TrackerBuilder::new()
	}

	/// Creates an uninitialized tracker sending over HTTP.
	pub fn new() -> Result<Self> {
		TrackerBuilder::new().build()
	}

	/// Validates and stores `config`. May be called again to switch app id or
	/// endpoint; queued events keep their attempt counts.
	pub fn init(&self, config: InitConfig) -> Result<()> {
		self.inner.config.init(config).map(|_| ())
	}

	pub fn is_initialized(&self) -> bool {
		self.inner.config.is_initialized()
	}

	/// The active config.
	pub fn config(&self) -> Result<InitConfig> {
		self.inner.config.get()
	}

	/// The request timeout the default transport was built with.
	pub fn request_timeout(&self) -> Duration {
		self.inner.client_config.request_timeout
	}

	/// Validates, enriches and sends one event.
	///
	/// Returns the enriched event so callers can correlate it with logs.
	pub async fn track(&self, category: &str, data: EventData) -> Result<EnrichedEvent> {
		let config = self.inner.config.get()?;
		let event = EnrichedEvent::enrich(&config, category, data)?;

		self.deliver(&event).await;
		Ok(event)
	}

	/// Like [`track`](Self::track) but accepts any JSON value as event data.
	pub async fn track_value(
		&self,
		category: &str,
		data: serde_json::Value,
	) -> Result<EnrichedEvent> {
		let config = self.inner.config.get()?;
		let data = EventData::try_from(data)?;
		let event = EnrichedEvent::enrich(&config, category, data)?;

		self.deliver(&event).await;
		Ok(event)
	}

	/// Sends immediately, handing the event to the retry queue on failure.
	async fn deliver(&self, event: &EnrichedEvent) {
		match self.inner.transport.send(event).await {
			Ok(()) => {
				debug!(event_id = %event.id, category = %event.category, "Event delivered");
			}
			Err(e) => {
				warn!(
					event_id = %event.id,
					error = %e,
					"Failed to send event immediately, adding to queue"
				);
				self.inner.queue.enqueue(event.clone());
			}
		}
	}

	/// The retry queue backing this tracker.
	pub fn queue(&self) -> &DeliveryQueue {
		&self.inner.queue
	}

	/// Number of events waiting for a retry.
	pub fn queue_size(&self) -> usize {
		self.inner.queue.size()
	}

	/// Drops every queued event and stops the retry scheduler.
	pub fn clear_queue(&self) {
		self.inner.queue.clear();
	}

	/// Stops background delivery. Queued events are discarded, not flushed.
	pub fn shutdown(&self) {
		self.inner.queue.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crux_tracker_core::ValidationError;

	#[test]
	fn test_new_tracker_is_uninitialized() {
		let tracker = Tracker::new().unwrap();
		assert!(!tracker.is_initialized());
		assert!(matches!(tracker.config(), Err(TrackerError::NotInitialized)));
		assert_eq!(tracker.queue_size(), 0);
	}

	#[test]
	fn test_builder_init_config() {
		let tracker = Tracker::builder()
			.init_config(InitConfig::new("app_1"))
			.build()
			.unwrap();
		assert!(tracker.is_initialized());
		assert_eq!(tracker.config().unwrap().app_id, "app_1");
	}

	#[test]
	fn test_builder_rejects_invalid_init_config() {
		let result = Tracker::builder().init_config(InitConfig::new(" ")).build();
		assert!(matches!(
			result,
			Err(TrackerError::InvalidConfig(ValidationError::EmptyAppId))
		));
	}

	#[test]
	fn test_client_config_defaults() {
		let tracker = Tracker::new().unwrap();
		assert_eq!(tracker.request_timeout(), Duration::from_secs(30));

		let tracker = Tracker::builder()
			.request_timeout(Duration::from_secs(5))
			.build()
			.unwrap();
		assert_eq!(tracker.request_timeout(), Duration::from_secs(5));
	}

	#[tokio::test]
	async fn test_track_before_init_fails() {
		let tracker = Tracker::new().unwrap();
		let result = tracker
			.track("signup", EventData::new().with_user_id("u"))
			.await;
		assert!(matches!(result, Err(TrackerError::NotInitialized)));
		assert_eq!(tracker.queue_size(), 0);
	}

	#[tokio::test]
	async fn test_track_value_rejects_non_object() {
		let tracker = Tracker::builder()
			.init_config(InitConfig::new("app"))
			.build()
			.unwrap();
		let result = tracker.track_value("c", serde_json::json!("nope")).await;
		assert!(matches!(
			result,
			Err(TrackerError::Validation(ValidationError::NotAnObject))
		));
	}
}
