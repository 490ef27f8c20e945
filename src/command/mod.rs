// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Awtrix command definitions.
//!
//! Every request the display understands is a flat JSON object with exactly
//! one key. This module provides typed representations of that vocabulary.
//!
//! # Available Commands
//!
//! | Command Type | Wire form | Example |
//! |-------------|-----------|---------|
//! | [`Query`] | `{"get": ...}` | `matrixInfo`, `powerState`, `version` |
//! | [`PowerCommand`] | `{"power": bool}` | On, Off |
//! | [`AppCommand`] | `{"app": ...}` | `next`, `back`, `pause` |
//! | [`AnimationCommand`] | `{"showAnimation": ...}` | `random` |
//! | [`TimerCommand`] | `{"timer": ...}` | `10m`, `stop` |
//!
//! # Examples
//!
//! ```
//! use awtrix_bridge::command::{AppCommand, Command, Query};
//! use serde_json::json;
//!
//! assert_eq!(Query::MatrixInfo.to_json(), json!({"get": "matrixInfo"}));
//! assert_eq!(AppCommand::Next.to_json(), json!({"app": "next"}));
//! ```

mod app;
mod power;
mod query;

pub use app::{AnimationCommand, AppCommand, TimerCommand};
pub use power::PowerCommand;
pub use query::Query;

use serde_json::{Map, Value};

/// A command that can be sent to the display.
pub trait Command {
    /// Returns the single JSON key of the request.
    fn key(&self) -> &'static str;

    /// Returns the value sent under [`key`](Self::key).
    fn value(&self) -> Value;

    /// Returns the full request body.
    fn to_json(&self) -> Value {
        let mut body = Map::with_capacity(1);
        body.insert(self.key().to_string(), self.value());
        Value::Object(body)
    }
}

/// The closed set of operation kinds the dispatcher handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Switch the display on or off.
    Power,
    /// Navigate the app loop.
    App,
    /// Play an animation.
    Animation,
    /// Start or stop the on-device timer.
    Timer,
}

impl OperationKind {
    /// Returns a short lowercase name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::App => "app",
            Self::Animation => "animation",
            Self::Timer => "timer",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A "set" style operation together with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Power the display on or off.
    Power(PowerCommand),
    /// App loop navigation.
    App(AppCommand),
    /// Animation trigger.
    Animation(AnimationCommand),
    /// Timer start/stop.
    Timer(TimerCommand),
}

impl Operation {
    /// Returns the kind of this operation.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Power(_) => OperationKind::Power,
            Self::App(_) => OperationKind::App,
            Self::Animation(_) => OperationKind::Animation,
            Self::Timer(_) => OperationKind::Timer,
        }
    }

    fn command(&self) -> &dyn Command {
        match self {
            Self::Power(cmd) => cmd,
            Self::App(cmd) => cmd,
            Self::Animation(cmd) => cmd,
            Self::Timer(cmd) => cmd,
        }
    }
}

impl Command for Operation {
    fn key(&self) -> &'static str {
        self.command().key()
    }

    fn value(&self) -> Value {
        self.command().value()
    }
}

impl From<PowerCommand> for Operation {
    fn from(cmd: PowerCommand) -> Self {
        Self::Power(cmd)
    }
}

impl From<AppCommand> for Operation {
    fn from(cmd: AppCommand) -> Self {
        Self::App(cmd)
    }
}

impl From<AnimationCommand> for Operation {
    fn from(cmd: AnimationCommand) -> Self {
        Self::Animation(cmd)
    }
}

impl From<TimerCommand> for Operation {
    fn from(cmd: TimerCommand) -> Self {
        Self::Timer(cmd)
    }
}
