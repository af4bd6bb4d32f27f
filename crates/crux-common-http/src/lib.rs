// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the Crux tracker.
//!
//! Every outgoing request carries the same User-Agent so the collector can
//! tell SDK versions and platforms apart.

mod client;

pub use client::{builder, new_client, platform, user_agent, SDK_NAME};
