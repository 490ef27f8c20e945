// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry snapshot.

use crate::response::MatrixInfoResponse;

/// The latest known telemetry of the display.
///
/// Every field is optional: `None` means "never reported", not zero. The
/// rounding and fallback policy belongs to the accessories reading it.
///
/// # Examples
///
/// ```
/// use awtrix_bridge::telemetry::DeviceSnapshot;
///
/// let snapshot = DeviceSnapshot::default();
/// assert_eq!(snapshot.temperature(), None);
/// assert_eq!(snapshot.firmware_version_or_unknown(), "UNKNOWN");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    temperature: Option<f64>,
    humidity: Option<f64>,
    firmware_version: Option<String>,
}

impl DeviceSnapshot {
    /// Placeholder reported when the firmware version is not known.
    pub const UNKNOWN_VERSION: &'static str = "UNKNOWN";

    /// Creates a snapshot from explicit values.
    #[must_use]
    pub fn new(
        temperature: Option<f64>,
        humidity: Option<f64>,
        firmware_version: Option<String>,
    ) -> Self {
        Self {
            temperature,
            humidity,
            firmware_version,
        }
    }

    /// Returns the last reported temperature in degrees Celsius.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Returns the last reported relative humidity.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// Returns the last reported firmware version.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.firmware_version.as_deref()
    }

    /// Returns the firmware version, or `"UNKNOWN"`.
    #[must_use]
    pub fn firmware_version_or_unknown(&self) -> &str {
        self.firmware_version().unwrap_or(Self::UNKNOWN_VERSION)
    }

    /// Returns `true` if nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.firmware_version.is_none()
    }

    /// Builds the next snapshot from a telemetry reply.
    ///
    /// Fields present in the reply replace the current ones; absent fields
    /// keep the value of the last reply that carried them.
    #[must_use]
    pub fn merged(&self, info: &MatrixInfoResponse) -> Self {
        Self {
            temperature: info.temperature.or(self.temperature),
            humidity: info.humidity.or(self.humidity),
            firmware_version: info
                .version
                .clone()
                .or_else(|| self.firmware_version.clone()),
        }
    }
}
