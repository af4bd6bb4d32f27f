// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retry scheduler driving a [`DeliveryQueue`](crate::DeliveryQueue).
//!
//! Every tick snapshots the whole queue, retries each entry once, and appends
//! failures back to the tail. Entries enqueued while a tick is sending wait
//! for the next tick.

use std::sync::Arc;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::queue::{QueueShared, MAX_RETRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
	Continue,
	Stopped,
}

/// Scheduler task body. Exits when a tick stops it or the task is aborted.
pub(crate) async fn run(shared: Arc<QueueShared>, generation: u64) {
	let mut ticker = interval_at(Instant::now() + shared.interval, shared.interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	loop {
		ticker.tick().await;
		if tick(&shared, generation).await == TickOutcome::Stopped {
			break;
		}
	}
}

async fn tick(shared: &QueueShared, generation: u64) -> TickOutcome {
	let batch = {
		let mut state = shared.state.lock();
		if !state.is_current(generation) {
			return TickOutcome::Stopped;
		}
		if state.entries.is_empty() {
			state.scheduler = None;
			info!(generation, "Delivery queue empty, retry scheduler stopped");
			return TickOutcome::Stopped;
		}
		state.drain()
	};

	debug!(generation, batch_size = batch.len(), "Retrying queued events");

	for mut entry in batch {
		let result = shared.transport.send(&entry.event).await;

		match result {
			Ok(()) => {
				info!(
					event_id = %entry.event.id,
					attempts = entry.attempts,
					"Queued event sent successfully"
				);
				shared.observer.on_delivered(&entry).await;
			}
			Err(e) => {
				entry.attempts += 1;

				if entry.attempts < MAX_RETRIES {
					let mut state = shared.state.lock();
					if !state.is_current(generation) {
						return TickOutcome::Stopped;
					}
					warn!(
						event_id = %entry.event.id,
						attempt = entry.attempts,
						max_retries = MAX_RETRIES,
						error = %e,
						"Event retry failed, re-queued"
					);
					state.entries.push_back(entry);
				} else {
					error!(
						event_id = %entry.event.id,
						attempts = entry.attempts,
						error = %e,
						"Event dropped after exhausting retries"
					);
					shared.observer.on_delivery_failed(&entry).await;
				}
			}
		}
	}

	let mut state = shared.state.lock();
	if !state.is_current(generation) {
		return TickOutcome::Stopped;
	}
	if state.entries.is_empty() {
		state.scheduler = None;
		info!(generation, "Delivery queue drained, retry scheduler stopped");
		return TickOutcome::Stopped;
	}

	TickOutcome::Continue
}
