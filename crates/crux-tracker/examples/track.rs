// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: track a single event using the crux-tracker SDK.
//!
//! Run with:
//!   CRUX_APP_ID=my_app cargo run --example track -p crux-tracker -- signup --user-id user_42 plan=pro

use std::time::Duration;

use clap::Parser;
use crux_tracker::{EventData, InitConfig, Tracker, RETRY_INTERVAL};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Send one event to a Crux collector")]
struct Args {
	/// Application id reported with every event.
	#[arg(long, env = "CRUX_APP_ID")]
	app_id: String,

	/// Collection endpoint. Defaults to the SDK endpoint.
	#[arg(long, env = "CRUX_API_ENDPOINT")]
	api_endpoint: Option<String>,

	/// User id attached to the event.
	#[arg(long, env = "CRUX_USER_ID", default_value = "example_user")]
	user_id: String,

	/// Seconds to keep the process alive so queued retries can run.
	#[arg(long, default_value_t = 0)]
	linger_secs: u64,

	/// Event category.
	category: String,

	/// Extra `key=value` properties.
	properties: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let args = Args::parse();

	let mut init = InitConfig::new(&args.app_id);
	if let Some(endpoint) = &args.api_endpoint {
		init = init.with_api_endpoint(endpoint);
	}

	let tracker = Tracker::builder().init_config(init).build()?;

	let mut data = EventData::new().with_user_id(&args.user_id);
	for property in &args.properties {
		let (key, value) = property
			.split_once('=')
			.ok_or_else(|| format!("expected key=value, got '{property}'"))?;
		data = data.insert(key, value);
	}

	let event = tracker.track(&args.category, data).await?;
	info!(event_id = %event.id, category = %event.category, "Event tracked");

	if tracker.queue_size() > 0 && args.linger_secs > 0 {
		info!(
			queued = tracker.queue_size(),
			retry_interval_secs = RETRY_INTERVAL.as_secs(),
			"Waiting for queued retries"
		);
		tokio::time::sleep(Duration::from_secs(args.linger_secs)).await;
	}

	tracker.shutdown();
	Ok(())
}
