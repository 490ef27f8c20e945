// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! App loop, animation and timer commands.

use serde_json::Value;

use crate::command::Command;

/// Navigation within the display's app loop.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::command::{AppCommand, Command};
/// use serde_json::json;
///
/// assert_eq!(AppCommand::Pause.to_json(), json!({"app": "pause"}));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCommand {
    /// Switch to the next app.
    Next,
    /// Switch to the previous app.
    Back,
    /// Pause (or resume) automatic app switching.
    Pause,
}

impl AppCommand {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Back => "back",
            Self::Pause => "pause",
        }
    }
}

impl Command for AppCommand {
    fn key(&self) -> &'static str {
        "app"
    }

    fn value(&self) -> Value {
        Value::from(self.as_str())
    }
}

/// Plays an animation on the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnimationCommand {
    /// Let the device pick an animation.
    Random,
    /// Play a named animation.
    Named(String),
}

impl Command for AnimationCommand {
    fn key(&self) -> &'static str {
        "showAnimation"
    }

    fn value(&self) -> Value {
        match self {
            Self::Random => Value::from("random"),
            Self::Named(name) => Value::from(name.as_str()),
        }
    }
}

/// Starts or stops the on-device timer.
///
/// The duration string is passed through unchanged (`"10m"`, `"90s"`, ...).
///
/// # Examples
///
/// ```
/// use awtrix_bridge::command::{Command, TimerCommand};
/// use serde_json::json;
///
/// assert_eq!(TimerCommand::start("10m").to_json(), json!({"timer": "10m"}));
/// assert_eq!(TimerCommand::Stop.to_json(), json!({"timer": "stop"}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerCommand {
    /// Start a timer of the given duration.
    Start(String),
    /// Stop the running timer.
    Stop,
}

impl TimerCommand {
    /// Creates a start command.
    #[must_use]
    pub fn start(duration: impl Into<String>) -> Self {
        Self::Start(duration.into())
    }
}

impl Command for TimerCommand {
    fn key(&self) -> &'static str {
        "timer"
    }

    fn value(&self) -> Value {
        match self {
            Self::Start(duration) => Value::from(duration.as_str()),
            Self::Stop => Value::from("stop"),
        }
    }
}
