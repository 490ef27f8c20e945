// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory projections.
//!
//! Each projection maps host characteristic reads and writes onto either the
//! shared [`TelemetryCache`](crate::telemetry::TelemetryCache) or the
//! [`CommandDispatcher`](crate::dispatcher::CommandDispatcher). The host
//! framework is reached only through the [`ServiceFactory`] and
//! [`HostService`] traits in [`host`].
//!
//! Handlers never surface errors to the host. Failures are logged and the
//! read handlers return a safe default (`false`, `0`, `"UNKNOWN"`).

mod app_loop;
pub mod host;
mod information;
mod media;
mod momentary;
mod power;
mod remote;
mod sensor;

pub use app_loop::AppLoopSwitch;
pub use host::{
    BoxFuture, Characteristic, CharacteristicValue, GetHandler, HostService, ServiceFactory,
    ServiceKind, SetHandler, get_handler, set_handler,
};
pub use information::InformationService;
pub use media::{CurrentMediaState, MediaControl, TargetMediaState};
pub use momentary::MomentaryButton;
pub use power::PowerSwitch;
pub use remote::{
    DEFAULT_TIMER_DURATION, RemoteAction, RemoteControl, RemoteKey, action_for,
};
pub use sensor::{ClimateSensor, SensorKind, round_one_decimal};
