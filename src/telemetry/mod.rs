// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared telemetry polling.
//!
//! A [`TelemetryCache`] owns one background task that periodically sends
//! `{"get":"matrixInfo"}` to the display and publishes the result as a
//! [`DeviceSnapshot`]. Any number of accessories read the latest snapshot
//! without touching the network.
//!
//! The [`TelemetryRegistry`] makes sure there is at most one polling loop per
//! device endpoint.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use awtrix_bridge::protocol::HttpClient;
//! use awtrix_bridge::telemetry::TelemetryRegistry;
//!
//! # async fn example() -> awtrix_bridge::Result<()> {
//! let client = Arc::new(HttpClient::new("192.168.1.60")?);
//! let registry = TelemetryRegistry::new();
//! let cache = registry.get_or_start(client.endpoint(), client.clone(), Duration::from_secs(30));
//!
//! let snapshot = cache.read();
//! println!("temperature: {:?}", snapshot.temperature());
//! # Ok(())
//! # }
//! ```

mod cache;
mod registry;
mod snapshot;

pub use cache::{PollOutcome, TelemetryCache};
pub use registry::TelemetryRegistry;
pub use snapshot::DeviceSnapshot;
