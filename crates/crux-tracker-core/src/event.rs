// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event payloads and enrichment.
//!
//! Callers hand the tracker a category name and an [`EventData`] object. The
//! tracker turns that into an [`EnrichedEvent`] by attaching a fresh event id,
//! the application id, the event time and the local timezone.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::InitConfig;
use crate::error::ValidationError;

/// Reserved data key carrying the user id. Required.
pub const USER_ID_KEY: &str = "userId";
/// Reserved data key carrying the event time in epoch milliseconds. Optional.
pub const EVENT_TIME_KEY: &str = "eventTime";

/// Timezone reported when the host timezone cannot be determined.
const FALLBACK_TIMEZONE: &str = "UTC";

/// Unique identifier of a tracked event (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for EventId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for EventId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Arbitrary key-value payload of a tracked event.
///
/// `userId` is required and `eventTime` is optional; every other key is
/// passed through to the collection endpoint untouched.
///
/// # Example
///
/// ```
/// use crux_tracker_core::EventData;
///
/// let data = EventData::new()
///     .with_user_id("user_42")
///     .insert("button", "checkout")
///     .insert("price", 99.99);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData {
	inner: Map<String, Value>,
}

impl EventData {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a key-value pair.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Sets the reserved `userId` key.
	pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
		self.insert(USER_ID_KEY, user_id.into())
	}

	/// Sets the reserved `eventTime` key (epoch milliseconds).
	pub fn with_event_time(self, epoch_millis: i64) -> Self {
		self.insert(EVENT_TIME_KEY, epoch_millis)
	}

	/// Returns true if the payload has no keys.
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Returns the number of keys.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Gets a value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	/// The validated `userId`.
	pub fn user_id(&self) -> Result<&str, ValidationError> {
		match self.inner.get(USER_ID_KEY) {
			Some(Value::String(id)) if !id.is_empty() => Ok(id),
			_ => Err(ValidationError::MissingUserId),
		}
	}

	/// The validated `eventTime`, if one was supplied.
	pub fn event_time(&self) -> Result<Option<i64>, ValidationError> {
		let Some(value) = self.inner.get(EVENT_TIME_KEY) else {
			return Ok(None);
		};

		if let Some(millis) = value.as_i64() {
			if millis > 0 {
				return Ok(Some(millis));
			}
		} else if let Some(millis) = value.as_f64() {
			// JSON numbers like 1.7e12 are integers even when stored as floats.
			if millis > 0.0 && millis.fract() == 0.0 && millis <= i64::MAX as f64 {
				return Ok(Some(millis as i64));
			}
		}

		Err(ValidationError::InvalidEventTime(value.to_string()))
	}

	/// Converts the payload into a `serde_json::Value`.
	pub fn into_value(self) -> Value {
		Value::Object(self.inner)
	}
}

impl From<EventData> for Value {
	fn from(data: EventData) -> Self {
		data.into_value()
	}
}

impl From<Map<String, Value>> for EventData {
	fn from(map: Map<String, Value>) -> Self {
		Self { inner: map }
	}
}

impl TryFrom<Value> for EventData {
	type Error = ValidationError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Object(map) => Ok(Self { inner: map }),
			_ => Err(ValidationError::NotAnObject),
		}
	}
}

/// A validated event with identity and timing metadata attached.
///
/// Immutable once built; the delivery queue clones it for every retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
	pub id: EventId,
	pub app_id: String,
	pub category: String,
	/// Epoch milliseconds.
	pub event_time: i64,
	/// IANA timezone name of the emitting host.
	pub timezone: String,
	pub data: EventData,
	pub user_id: String,
}

impl EnrichedEvent {
	/// Validates the input and enriches it using the current clock and host timezone.
	pub fn enrich(
		config: &InitConfig,
		category: &str,
		data: EventData,
	) -> Result<Self, ValidationError> {
		Self::enrich_at(
			config,
			category,
			data,
			Utc::now().timestamp_millis(),
			local_timezone(),
		)
	}

	/// Same as [`enrich`](Self::enrich) with an explicit clock reading and timezone.
	pub fn enrich_at(
		config: &InitConfig,
		category: &str,
		data: EventData,
		now_millis: i64,
		timezone: impl Into<String>,
	) -> Result<Self, ValidationError> {
		if config.app_id.trim().is_empty() {
			return Err(ValidationError::EmptyAppId);
		}

		let category = category.trim();
		if category.is_empty() {
			return Err(ValidationError::EmptyCategory);
		}

		let user_id = data.user_id()?.to_string();
		let event_time = data.event_time()?.unwrap_or(now_millis);

		let mut timezone = timezone.into();
		if timezone.is_empty() {
			timezone = FALLBACK_TIMEZONE.to_string();
		}

		Ok(Self {
			id: EventId::new(),
			app_id: config.app_id.clone(),
			category: category.to_string(),
			event_time,
			timezone,
			data,
			user_id,
		})
	}
}

/// IANA name of the host timezone, `UTC` when it cannot be determined.
pub fn local_timezone() -> String {
	iana_time_zone::get_timezone()
		.ok()
		.filter(|tz| !tz.is_empty())
		.unwrap_or_else(|| FALLBACK_TIMEZONE.to_string())
}
