// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry and version replies.

use serde::Deserialize;

/// Reply to `{"get":"matrixInfo"}`.
///
/// All fields are optional: sensors may be missing from the build and the
/// display omits what it does not know.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::response::MatrixInfoResponse;
///
/// let json = r#"{"Temp":21.34,"Hum":55.6,"version":"1.2"}"#;
/// let info: MatrixInfoResponse = serde_json::from_str(json).unwrap();
/// assert_eq!(info.temperature, Some(21.34));
/// assert_eq!(info.version.as_deref(), Some("1.2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MatrixInfoResponse {
    /// Temperature in degrees Celsius.
    #[serde(rename = "Temp", default)]
    pub temperature: Option<f64>,

    /// Relative humidity in percent.
    #[serde(rename = "Hum", default)]
    pub humidity: Option<f64>,

    /// Firmware version string.
    #[serde(rename = "version", default, deserialize_with = "version_string")]
    pub version: Option<String>,
}

impl MatrixInfoResponse {
    /// Returns `true` if none of the recognized fields is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.version.is_none()
    }
}

/// Reply to `{"get":"version"}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VersionResponse {
    /// Software version string.
    #[serde(default, deserialize_with = "version_string")]
    pub version: Option<String>,
}

/// Accepts versions reported either as strings or as bare numbers.
fn version_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
