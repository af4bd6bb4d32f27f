// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Validation errors for configuration and event input.

use thiserror::Error;

/// Reasons an [`InitConfig`](crate::InitConfig) or a tracked event is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// The application id is missing or blank.
	#[error("appId is required")]
	EmptyAppId,

	/// The API endpoint is not an absolute http(s) URL.
	#[error("invalid API endpoint '{endpoint}': {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	/// The event category is missing or blank.
	#[error("category name is required and must be a non-empty string")]
	EmptyCategory,

	/// Event data has no usable `userId`.
	#[error("userId is required and must be a non-empty string")]
	MissingUserId,

	/// `eventTime` was supplied but is not a positive integer.
	#[error("eventTime must be a positive integer, got {0}")]
	InvalidEventTime(String),

	/// Event data was not a JSON object.
	#[error("event data must be a JSON object")]
	NotAnObject,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_messages_name_the_field() {
		assert!(ValidationError::EmptyAppId.to_string().contains("appId"));
		assert!(ValidationError::MissingUserId.to_string().contains("userId"));
		assert!(ValidationError::InvalidEventTime("-1".into())
			.to_string()
			.contains("eventTime"));
	}

	#[test]
	fn test_invalid_endpoint_includes_reason() {
		let err = ValidationError::InvalidEndpoint {
			endpoint: "ftp://x".to_string(),
			reason: "unsupported scheme".to_string(),
		};
		let msg = err.to_string();
		assert!(msg.contains("ftp://x"));
		assert!(msg.contains("unsupported scheme"));
	}
}
