// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hooks for observing the outcome of queued deliveries.
//!
//! Once an event lands in the retry queue the `track` call that queued it has
//! already returned, so its fate is invisible to the caller. A
//! [`DeliveryObserver`] is the only way to learn about it.
//!
//! # Example
//!
//! ```ignore
//! use crux_tracker::{DeliveryObserver, QueuedEntry, Tracker};
//! use async_trait::async_trait;
//!
//! struct DeadLetters;
//!
//! #[async_trait]
//! impl DeliveryObserver for DeadLetters {
//!     async fn on_delivery_failed(&self, entry: &QueuedEntry) {
//!         eprintln!("dropped {} after {} attempts", entry.event.id, entry.attempts);
//!     }
//! }
//!
//! let tracker = Tracker::builder()
//!     .delivery_observer(DeadLetters)
//!     .build()?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::queue::QueuedEntry;

/// Receives the terminal outcome of every queued entry.
///
/// Both methods default to doing nothing.
#[async_trait]
pub trait DeliveryObserver: Send + Sync {
	/// A queued entry was delivered by the retry scheduler.
	async fn on_delivered(&self, _entry: &QueuedEntry) {}

	/// A queued entry exhausted its retries and was dropped.
	async fn on_delivery_failed(&self, _entry: &QueuedEntry) {}
}

/// Observer that ignores every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDeliveryObserver;

#[async_trait]
impl DeliveryObserver for NoOpDeliveryObserver {}

pub type SharedDeliveryObserver = Arc<dyn DeliveryObserver>;
