// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command acknowledgements.

use serde::Deserialize;
use serde_json::Value;

/// Literal reply of the display when app switching has been paused.
pub const PAUSE_CONFIRMATION: &str = "App switching paused";

/// Generic `{"success": bool}` acknowledgement.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::response::CommandAck;
///
/// let ack: CommandAck = serde_json::from_str(r#"{"success": true}"#).unwrap();
/// assert!(ack.is_success());
///
/// let missing: CommandAck = serde_json::from_str("{}").unwrap();
/// assert!(!missing.is_success());
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommandAck {
    #[serde(default)]
    success: Option<bool>,
}

impl CommandAck {
    /// Reads the success indicator from any reply.
    ///
    /// Non-object replies and objects without a boolean `success` field count
    /// as not acknowledged.
    #[must_use]
    pub fn from_reply(reply: &Value) -> Self {
        Self {
            success: reply.get("success").and_then(Value::as_bool),
        }
    }

    /// Returns `true` only when the device reported `"success": true`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }

    /// Returns the raw indicator, `None` when absent.
    #[must_use]
    pub fn success(&self) -> Option<bool> {
        self.success
    }
}

/// Returns `true` if the reply is the literal pause confirmation text.
///
/// The pause endpoint does not use the `success` field, so the reply text is
/// matched exactly.
#[must_use]
pub fn is_pause_confirmation(reply: &Value) -> bool {
    reply.as_str() == Some(PAUSE_CONFIRMATION)
}
