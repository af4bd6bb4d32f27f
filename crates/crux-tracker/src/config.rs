// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration shared by the tracker and its transport.

use crux_tracker_core::InitConfig;
use parking_lot::RwLock;
use tracing::info;

use crate::error::{Result, TrackerError};

/// Holds the config set by `init`.
///
/// The HTTP transport reads from here on every send, so calling `init`
/// again redirects the next request without restarting anything.
#[derive(Debug, Default)]
pub struct ConfigStore {
	current: RwLock<Option<InitConfig>>,
}

impl ConfigStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Validates and stores `config`, replacing any previous one.
	pub fn init(&self, config: InitConfig) -> Result<InitConfig> {
		let config = config.validate().map_err(TrackerError::InvalidConfig)?;
		*self.current.write() = Some(config.clone());

		info!(
			app_id = %config.app_id,
			api_endpoint = %config.endpoint(),
			"Tracker SDK initialized"
		);

		Ok(config)
	}

	/// The active config, or [`TrackerError::NotInitialized`].
	pub fn get(&self) -> Result<InitConfig> {
		self.current
			.read()
			.clone()
			.ok_or(TrackerError::NotInitialized)
	}

	pub fn is_initialized(&self) -> bool {
		self.current.read().is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crux_tracker_core::{ValidationError, DEFAULT_API_ENDPOINT};

	#[test]
	fn test_get_before_init_fails() {
		let store = ConfigStore::new();
		assert!(!store.is_initialized());
		assert!(matches!(store.get(), Err(TrackerError::NotInitialized)));
	}

	#[test]
	fn test_init_stores_validated_config() {
		let store = ConfigStore::new();
		store.init(InitConfig::new("app_1")).unwrap();

		assert!(store.is_initialized());
		let config = store.get().unwrap();
		assert_eq!(config.app_id, "app_1");
		assert_eq!(config.endpoint(), DEFAULT_API_ENDPOINT);
	}

	#[test]
	fn test_invalid_init_keeps_previous_config() {
		let store = ConfigStore::new();
		store.init(InitConfig::new("app_1")).unwrap();

		let result = store.init(InitConfig::new(""));
		assert!(matches!(
			result,
			Err(TrackerError::InvalidConfig(ValidationError::EmptyAppId))
		));
		assert_eq!(store.get().unwrap().app_id, "app_1");
	}

	#[test]
	fn test_reinit_replaces_config() {
		let store = ConfigStore::new();
		store.init(InitConfig::new("app_1")).unwrap();
		store
			.init(InitConfig::new("app_2").with_api_endpoint("http://localhost:9000/e"))
			.unwrap();

		let config = store.get().unwrap();
		assert_eq!(config.app_id, "app_2");
		assert_eq!(config.endpoint(), "http://localhost:9000/e");
	}
}
