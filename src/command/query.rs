// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only queries.

use serde_json::Value;

use crate::command::Command;

/// A `{"get": ...}` query.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::command::{Command, Query};
///
/// assert_eq!(Query::PowerState.to_json().to_string(), r#"{"get":"powerState"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    /// Telemetry: temperature, humidity and firmware version.
    MatrixInfo,
    /// Whether the matrix is currently on.
    PowerState,
    /// Software version.
    Version,
}

impl Query {
    /// Returns the wire name of the query.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatrixInfo => "matrixInfo",
            Self::PowerState => "powerState",
            Self::Version => "version",
        }
    }
}

impl Command for Query {
    fn key(&self) -> &'static str {
        "get"
    }

    fn value(&self) -> Value {
        Value::from(self.as_str())
    }
}
