// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature and humidity projections backed by the telemetry cache.

use std::sync::Arc;

use crate::telemetry::{DeviceSnapshot, TelemetryCache};

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
};

/// Which telemetry field a sensor exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Temperature in degrees Celsius.
    Temperature,
    /// Relative humidity in percent.
    Humidity,
}

impl SensorKind {
    fn service_kind(self) -> ServiceKind {
        match self {
            Self::Temperature => ServiceKind::TemperatureSensor,
            Self::Humidity => ServiceKind::HumiditySensor,
        }
    }

    fn characteristic(self) -> Characteristic {
        match self {
            Self::Temperature => Characteristic::CurrentTemperature,
            Self::Humidity => Characteristic::CurrentRelativeHumidity,
        }
    }

    fn pick(self, snapshot: &DeviceSnapshot) -> Option<f64> {
        match self {
            Self::Temperature => snapshot.temperature(),
            Self::Humidity => snapshot.humidity(),
        }
    }
}

/// Rounds to one decimal place.
///
/// ```
/// use awtrix_bridge::accessory::round_one_decimal;
///
/// assert_eq!(round_one_decimal(21.34), 21.3);
/// assert_eq!(format!("{:.1}", round_one_decimal(55.6)), "55.6");
/// ```
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A sensor reading the shared telemetry snapshot.
///
/// When the device never reported the field the sensor answers with its
/// fallback (`0.0` by default), which the host cannot tell apart from a real
/// zero. [`try_reading`](Self::try_reading) exposes the distinction.
#[derive(Debug)]
pub struct ClimateSensor {
    kind: SensorKind,
    name: String,
    cache: Arc<TelemetryCache>,
    fallback: f64,
}

impl ClimateSensor {
    /// Default value reported while no reading is available.
    pub const DEFAULT_FALLBACK: f64 = 0.0;

    /// Creates a temperature sensor.
    #[must_use]
    pub fn temperature(name: impl Into<String>, cache: Arc<TelemetryCache>) -> Self {
        Self::new(SensorKind::Temperature, name, cache)
    }

    /// Creates a humidity sensor.
    #[must_use]
    pub fn humidity(name: impl Into<String>, cache: Arc<TelemetryCache>) -> Self {
        Self::new(SensorKind::Humidity, name, cache)
    }

    /// Creates a sensor of the given kind.
    #[must_use]
    pub fn new(kind: SensorKind, name: impl Into<String>, cache: Arc<TelemetryCache>) -> Self {
        Self {
            kind,
            name: name.into(),
            cache,
            fallback: Self::DEFAULT_FALLBACK,
        }
    }

    /// Sets the value reported while no reading is available.
    #[must_use]
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the sensor kind.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Returns the rounded reading, `None` if the device never reported it.
    #[must_use]
    pub fn try_reading(&self) -> Option<f64> {
        self.kind.pick(&self.cache.read()).map(round_one_decimal)
    }

    /// Returns the rounded reading, or the fallback.
    #[must_use]
    pub fn reading(&self) -> f64 {
        self.try_reading().unwrap_or_else(|| {
            tracing::debug!(accessory = %self.name, kind = ?self.kind, "No reading yet, using fallback");
            self.fallback
        })
    }

    /// Creates the sensor service and registers its read handler.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(self.kind.service_kind(), &self.name, None);

        let this = self;
        service.on_get(
            this.kind.characteristic(),
            get_handler(move || {
                let value = this.reading();
                async move { CharacteristicValue::Float(value) }
            }),
        );

        service
    }
}
