// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event tracking Rust SDK for Crux.
//!
//! Applications initialize a [`Tracker`] once with an application id and
//! optionally a collection endpoint, then emit named events with arbitrary
//! payload data.
//!
//! # Delivery
//!
//! - **Immediate send**: every `track` call posts the event right away.
//! - **Retry queue**: a failed send moves the event into an in-memory
//!   [`DeliveryQueue`]; the `track` call still succeeds.
//! - **Retry scheduler**: while the queue holds events, a timer retries all of
//!   them every [`RETRY_INTERVAL`] and drops an event after [`MAX_RETRIES`]
//!   failed attempts.
//! - **Fire and forget**: queued outcomes are only visible through a
//!   [`DeliveryObserver`].
//!
//! Nothing is persisted; queued events are lost when the process exits.
//!
//! # Example
//!
//! ```ignore
//! use crux_tracker::{EventData, InitConfig, Tracker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = Tracker::new()?;
//!     tracker.init(InitConfig::new("my_app").with_api_endpoint("https://collector.example.com/events"))?;
//!
//!     let event = tracker
//!         .track("signup", EventData::new().with_user_id("user_42").insert("plan", "pro"))
//!         .await?;
//!     println!("tracked {}", event.id);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod observer;
mod queue;
mod scheduler;
mod tracker;
mod transport;

pub use config::ConfigStore;
pub use error::{Result, TrackerError, TransportError};
pub use observer::{DeliveryObserver, NoOpDeliveryObserver, SharedDeliveryObserver};
pub use queue::{DeliveryQueue, QueuedEntry, MAX_RETRIES, RETRY_INTERVAL};
pub use tracker::{ClientConfig, Tracker, TrackerBuilder};
pub use transport::{HttpTransport, Transport};

// Re-export core types for convenience
pub use crux_tracker_core::{
	EnrichedEvent, EventData, EventId, InitConfig, TrackPayload, ValidationError,
	DEFAULT_API_ENDPOINT,
};
