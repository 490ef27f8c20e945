// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Awtrix Bridge - expose an Awtrix pixel-matrix display as home-automation
//! accessories.
//!
//! The display speaks a small JSON vocabulary over a single HTTP endpoint.
//! This crate keeps a shared telemetry cache per display, dispatches commands,
//! and projects both onto accessory services offered by a host framework.
//!
//! # Layers
//!
//! - [`protocol`]: the [`Transport`] contract and its HTTP implementation
//! - [`telemetry`]: one polling [`TelemetryCache`] per endpoint
//! - [`dispatcher`]: turns [`Operation`]s into classified [`CommandResult`]s
//! - [`accessory`]: switches, sensors, remote and media projections
//! - [`registry`]: builds the accessories of one [`BridgeConfig`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use awtrix_bridge::command::{AppCommand, Operation};
//! use awtrix_bridge::{CommandDispatcher, HttpClient};
//!
//! #[tokio::main]
//! async fn main() -> awtrix_bridge::Result<()> {
//!     let client = Arc::new(HttpClient::new("192.168.1.60")?);
//!     let dispatcher = CommandDispatcher::new(client);
//!
//!     let next = Operation::from(AppCommand::Next);
//!     dispatcher.send(next.clone()).await.into_result(&next)?;
//!
//!     if dispatcher.power_state().await? == Some(true) {
//!         println!("display is on");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Host integration
//!
//! Implement [`ServiceFactory`](accessory::ServiceFactory) and
//! [`HostService`](accessory::HostService) for the host framework, then hand
//! the factory to [`AccessoryRegistry::new`]. A single [`TelemetryRegistry`]
//! should be shared by every registry of the process so that each display is
//! polled once.

pub mod accessory;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod response;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use command::{
    AnimationCommand, AppCommand, Command, Operation, OperationKind, PowerCommand, Query,
    TimerCommand,
};
pub use dispatcher::{CommandDispatcher, CommandResult};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result};
pub use protocol::{HttpClient, HttpConfig, Transport};
pub use registry::{AccessoryRegistry, AccessoryToggles, BridgeConfig, RegisteredAccessory};
pub use telemetry::{DeviceSnapshot, PollOutcome, TelemetryCache, TelemetryRegistry};
