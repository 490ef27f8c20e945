// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for display replies.
//!
//! The reply shape depends on the request:
//!
//! | Request | Reply |
//! |---------|-------|
//! | `{"get":"matrixInfo"}` | [`MatrixInfoResponse`] |
//! | `{"get":"powerState"}` | [`PowerStateResponse`] |
//! | `{"get":"version"}` | [`VersionResponse`] |
//! | any command | [`CommandAck`] |
//! | `{"app":"pause"}` | plain text, see [`is_pause_confirmation`] |

mod ack;
mod matrix_info;
mod power;

pub use ack::{CommandAck, PAUSE_CONFIRMATION, is_pause_confirmation};
pub use matrix_info::{MatrixInfoResponse, VersionResponse};
pub use power::PowerStateResponse;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ParseError;

/// Parses a decoded reply into a typed response.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedFormat` if the reply is not a JSON object,
/// or `ParseError::Json` if a field has the wrong type.
pub fn parse_object<T: DeserializeOwned>(reply: &Value) -> Result<T, ParseError> {
    if !reply.is_object() {
        return Err(ParseError::UnexpectedFormat(format!(
            "expected a JSON object, got {reply}"
        )));
    }
    T::deserialize(reply).map_err(ParseError::Json)
}

/// Interprets a JSON value the way the display firmware does.
///
/// Booleans map directly, numbers are on when non-zero, and strings accept
/// `true`/`on`/`1`. Anything else is unknown.
#[must_use]
pub fn truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" => Some(true),
            "false" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
