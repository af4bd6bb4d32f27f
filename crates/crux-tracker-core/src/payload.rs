// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire format of a single event sent to the collection endpoint.
//!
//! | Key   | Source                       |
//! |-------|------------------------------|
//! | `aid` | application id               |
//! | `eid` | event id                     |
//! | `uid` | user id                      |
//! | `dtm` | event time (epoch ms)        |
//! | `tz`  | IANA timezone                |
//! | `p`   | platform tag ([`PLATFORM`])  |
//! | `e`   | category                     |
//! | `tv`  | tracker version tag          |
//! | `ev`  | event data object            |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{EnrichedEvent, EventId};

/// Platform tag expected by the collector for server-side trackers.
pub const PLATFORM: &str = "node";
/// Tracker version tag expected by the collector.
pub const TRACKER_VERSION: &str = "for-audienz";

/// JSON body POSTed for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPayload {
	pub aid: String,
	pub eid: EventId,
	pub uid: String,
	pub dtm: i64,
	pub tz: String,
	pub p: String,
	pub e: String,
	pub tv: String,
	pub ev: Value,
}

impl TrackPayload {
	pub fn from_event(event: &EnrichedEvent) -> Self {
		Self {
			aid: event.app_id.clone(),
			eid: event.id,
			uid: event.user_id.clone(),
			dtm: event.event_time,
			tz: event.timezone.clone(),
			p: PLATFORM.to_string(),
			e: event.category.clone(),
			tv: TRACKER_VERSION.to_string(),
			ev: event.data.clone().into_value(),
		}
	}
}

impl From<&EnrichedEvent> for TrackPayload {
	fn from(event: &EnrichedEvent) -> Self {
		Self::from_event(event)
	}
}
