// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use serde_json::Value;

use crate::command::Command;

/// Command to switch the matrix on or off.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::command::{Command, PowerCommand};
/// use serde_json::json;
///
/// assert_eq!(PowerCommand::from(true).to_json(), json!({"power": true}));
/// assert_eq!(PowerCommand::Off.value(), json!(false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerCommand {
    /// Turn the matrix on.
    On,
    /// Turn the matrix off.
    Off,
}

impl PowerCommand {
    /// Returns `true` for [`PowerCommand::On`].
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for PowerCommand {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl Command for PowerCommand {
    fn key(&self) -> &'static str {
        "power"
    }

    fn value(&self) -> Value {
        Value::Bool(self.is_on())
    }
}
