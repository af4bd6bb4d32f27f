// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracker SDK.
//!
//! Only [`TrackerError`] ever reaches the caller of `init` or `track`.
//! [`TransportError`] is absorbed by the retry path.

use crux_tracker_core::ValidationError;
use thiserror::Error;

/// Errors returned by the public tracker API.
#[derive(Debug, Error)]
pub enum TrackerError {
	/// `track` or `config` was called before `init`.
	#[error("SDK not initialized, call init() first")]
	NotInitialized,

	/// `init` received an invalid configuration.
	#[error("SDK initialization failed: {0}")]
	InvalidConfig(#[source] ValidationError),

	/// The category or event data was rejected.
	#[error("event tracking failed: {0}")]
	Validation(#[from] ValidationError),

	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// A single failed delivery attempt.
#[derive(Debug, Error)]
pub enum TransportError {
	/// No configuration to read the endpoint from.
	#[error("SDK not initialized, no endpoint to send to")]
	NotInitialized,

	/// Network failure, timeout, or unreadable response.
	#[error("failed to send event: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// The endpoint answered with a non-success status.
	#[error("failed to send event: API returned status {status}: {message}")]
	ServerError { status: u16, message: String },
}

impl TransportError {
	/// HTTP status of the response, if one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			TransportError::ServerError { status, .. } => Some(*status),
			TransportError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
			TransportError::NotInitialized => None,
		}
	}
}
