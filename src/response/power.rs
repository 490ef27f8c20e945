// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state reply parsing.

use serde::Deserialize;
use serde_json::Value;

use super::truthy;

/// Reply to `{"get":"powerState"}`.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::response::PowerStateResponse;
///
/// let response: PowerStateResponse = serde_json::from_str(r#"{"powerState": 1}"#).unwrap();
/// assert_eq!(response.is_on(), Some(true));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PowerStateResponse {
    #[serde(rename = "powerState", default)]
    power_state: Option<Value>,
}

impl PowerStateResponse {
    /// Returns the reported state, `None` when absent or not interpretable.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.power_state.as_ref().and_then(truthy)
    }
}
