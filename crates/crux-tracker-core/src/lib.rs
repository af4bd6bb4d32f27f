// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Crux event tracker.
//!
//! This crate holds everything that does not touch the network:
//!
//! - [`InitConfig`]: application id and collection endpoint
//! - [`EventData`]: the caller supplied payload of a tracked event
//! - [`EnrichedEvent`]: an event after identity and timing metadata is attached
//! - [`TrackPayload`]: the fixed-key JSON body sent to the collection endpoint
//! - [`ValidationError`]: everything that can be wrong with the above

pub mod config;
pub mod error;
pub mod event;
pub mod payload;

pub use config::{InitConfig, DEFAULT_API_ENDPOINT};
pub use error::ValidationError;
pub use event::{local_timezone, EnrichedEvent, EventData, EventId, EVENT_TIME_KEY, USER_ID_KEY};
pub use payload::{TrackPayload, PLATFORM, TRACKER_VERSION};
