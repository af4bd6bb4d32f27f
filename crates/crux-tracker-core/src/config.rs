// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker initialization settings.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// Collection endpoint used when [`InitConfig::api_endpoint`] is not set.
pub const DEFAULT_API_ENDPOINT: &str = "https://dev-uii.portqii.com/api/v1/events";

/// Settings passed to the tracker's `init`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfig {
	/// Identifier of the application emitting events.
	pub app_id: String,
	/// Collection endpoint. Falls back to [`DEFAULT_API_ENDPOINT`].
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_endpoint: Option<String>,
}

impl InitConfig {
	/// Creates a config for the given application id using the default endpoint.
	pub fn new(app_id: impl Into<String>) -> Self {
		Self {
			app_id: app_id.into(),
			api_endpoint: None,
		}
	}

	/// Sets the collection endpoint (builder pattern).
	pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.api_endpoint = Some(endpoint.into());
		self
	}

	/// Validates the config and fills in the default endpoint.
	///
	/// The returned config always has `api_endpoint` set.
	pub fn validate(self) -> Result<Self, ValidationError> {
		if self.app_id.trim().is_empty() {
			return Err(ValidationError::EmptyAppId);
		}

		let api_endpoint = match self.api_endpoint {
			Some(endpoint) => {
				check_endpoint(&endpoint)?;
				endpoint
			}
			None => DEFAULT_API_ENDPOINT.to_string(),
		};

		Ok(Self {
			app_id: self.app_id,
			api_endpoint: Some(api_endpoint),
		})
	}

	/// The endpoint events are posted to.
	pub fn endpoint(&self) -> &str {
		self.api_endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT)
	}
}

fn check_endpoint(endpoint: &str) -> Result<(), ValidationError> {
	let invalid = |reason: String| ValidationError::InvalidEndpoint {
		endpoint: endpoint.to_string(),
		reason,
	};

	let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
	match url.scheme() {
		"http" | "https" => Ok(()),
		other => Err(invalid(format!("unsupported scheme '{other}'"))),
	}
}
