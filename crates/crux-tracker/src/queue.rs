// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory retry queue for events whose immediate send failed.
//!
//! The queue owns a single retry scheduler task. Enqueueing into an idle queue
//! starts it; it stops itself once a tick leaves the queue empty, and
//! [`DeliveryQueue::clear`] stops it unconditionally.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crux_tracker_core::EnrichedEvent;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::observer::{NoOpDeliveryObserver, SharedDeliveryObserver};
use crate::scheduler;
use crate::transport::Transport;

/// Time between retry ticks.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(10);
/// Failed scheduler attempts after which an entry is dropped.
pub const MAX_RETRIES: u32 = 3;

/// An event waiting for redelivery.
#[derive(Debug, Clone)]
pub struct QueuedEntry {
	pub event: EnrichedEvent,
	/// Failed redelivery attempts so far.
	pub attempts: u32,
	/// When the event first entered the queue.
	pub enqueued_at: DateTime<Utc>,
}

impl QueuedEntry {
	pub fn new(event: EnrichedEvent) -> Self {
		Self {
			event,
			attempts: 0,
			enqueued_at: Utc::now(),
		}
	}
}

pub(crate) struct SchedulerHandle {
	pub(crate) generation: u64,
	task: JoinHandle<()>,
}

impl SchedulerHandle {
	/// False once the task has exited, including by panicking inside a
	/// transport or observer.
	fn is_live(&self) -> bool {
		!self.task.is_finished()
	}
}

/// Entries and scheduler slot share one lock so enqueue, drain and clear
/// observe each other atomically.
pub(crate) struct QueueState {
	pub(crate) entries: VecDeque<QueuedEntry>,
	pub(crate) scheduler: Option<SchedulerHandle>,
	generation: u64,
}

impl QueueState {
	/// True while the scheduler started as `generation` has not been stopped.
	pub(crate) fn is_current(&self, generation: u64) -> bool {
		self.scheduler
			.as_ref()
			.is_some_and(|s| s.generation == generation)
	}

	fn has_live_scheduler(&self) -> bool {
		self.scheduler.as_ref().is_some_and(SchedulerHandle::is_live)
	}

	pub(crate) fn drain(&mut self) -> Vec<QueuedEntry> {
		self.entries.drain(..).collect()
	}
}

pub(crate) struct QueueShared {
	pub(crate) state: Mutex<QueueState>,
	pub(crate) transport: Arc<dyn Transport>,
	pub(crate) observer: SharedDeliveryObserver,
	pub(crate) interval: Duration,
}

/// FIFO retry queue with its own scheduler.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct DeliveryQueue {
	shared: Arc<QueueShared>,
}

impl DeliveryQueue {
	/// Creates an empty queue that redelivers through `transport`.
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		Self::with_observer(transport, Arc::new(NoOpDeliveryObserver))
	}

	/// Creates an empty queue that reports terminal outcomes to `observer`.
	pub fn with_observer(transport: Arc<dyn Transport>, observer: SharedDeliveryObserver) -> Self {
		Self {
			shared: Arc::new(QueueShared {
				state: Mutex::new(QueueState {
					entries: VecDeque::new(),
					scheduler: None,
					generation: 0,
				}),
				transport,
				observer,
				interval: RETRY_INTERVAL,
			}),
		}
	}

	/// Appends `event` with zero attempts and starts the scheduler if idle.
	///
	/// Must be called from within a Tokio runtime for the scheduler to start.
	/// Outside one the entry is still stored and picked up once a later
	/// enqueue starts the scheduler.
	pub fn enqueue(&self, event: EnrichedEvent) {
		let entry = QueuedEntry::new(event);
		let event_id = entry.event.id;

		let mut state = self.shared.state.lock();
		state.entries.push_back(entry);
		debug!(event_id = %event_id, queue_size = state.entries.len(), "Event queued");

		if !state.has_live_scheduler() {
			if let Some(dead) = state.scheduler.take() {
				warn!(
					generation = dead.generation,
					"Retry scheduler exited unexpectedly, restarting"
				);
			}
			self.start_scheduler(&mut state);
		}
	}

	/// Number of entries currently held.
	pub fn size(&self) -> usize {
		self.shared.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.shared.state.lock().entries.is_empty()
	}

	/// Whether a scheduler task is active.
	pub fn is_scheduler_running(&self) -> bool {
		self.shared.state.lock().has_live_scheduler()
	}

	/// Copies of the held entries in queue order.
	pub fn snapshot(&self) -> Vec<QueuedEntry> {
		self.shared.state.lock().entries.iter().cloned().collect()
	}

	/// Removes and returns every held entry, leaving the queue empty.
	///
	/// The scheduler is left running; its next tick finds the queue empty and
	/// stops.
	pub fn drain_all(&self) -> Vec<QueuedEntry> {
		self.shared.state.lock().drain()
	}

	/// Discards every pending entry and stops the scheduler.
	///
	/// Nothing is flushed. A tick in flight when this runs is aborted and its
	/// re-queues are discarded.
	pub fn clear(&self) {
		let mut state = self.shared.state.lock();
		let discarded = state.entries.len();
		state.entries.clear();

		if let Some(handle) = state.scheduler.take() {
			handle.task.abort();
			info!(discarded, "Delivery queue cleared, retry scheduler stopped");
		} else if discarded > 0 {
			info!(discarded, "Delivery queue cleared");
		}
	}

	fn start_scheduler(&self, state: &mut QueueState) {
		let runtime = match tokio::runtime::Handle::try_current() {
			Ok(runtime) => runtime,
			Err(_) => {
				warn!("No Tokio runtime, retry scheduler will start on the next enqueue");
				return;
			}
		};

		state.generation += 1;
		let generation = state.generation;
		let task = runtime.spawn(scheduler::run(Arc::clone(&self.shared), generation));
		state.scheduler = Some(SchedulerHandle { generation, task });

		info!(
			generation,
			interval_secs = self.shared.interval.as_secs(),
			"Retry scheduler started"
		);
	}
}

impl std::fmt::Debug for DeliveryQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.shared.state.lock();
		f.debug_struct("DeliveryQueue")
			.field("size", &state.entries.len())
			.field("scheduler_running", &state.has_live_scheduler())
			.finish()
	}
}
