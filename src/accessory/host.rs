// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability surface consumed from the host automation framework.
//!
//! The bridge never talks to the framework directly. It receives a
//! [`ServiceFactory`] at construction, asks it for services, and registers
//! get/set handlers on the returned [`HostService`] handles.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::response::truthy;

/// A boxed, sendable future returned by characteristic handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Handler answering a characteristic read.
pub type GetHandler = Arc<dyn Fn() -> BoxFuture<CharacteristicValue> + Send + Sync>;

/// Handler applying a characteristic write.
pub type SetHandler = Arc<dyn Fn(CharacteristicValue) -> BoxFuture<()> + Send + Sync>;

/// Wraps an async closure into a [`GetHandler`].
pub fn get_handler<F, Fut>(f: F) -> GetHandler
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CharacteristicValue> + Send + 'static,
{
    Arc::new(move || -> BoxFuture<CharacteristicValue> { Box::pin(f()) })
}

/// Wraps an async closure into a [`SetHandler`].
pub fn set_handler<F, Fut>(f: F) -> SetHandler
where
    F: Fn(CharacteristicValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |value| -> BoxFuture<()> { Box::pin(f(value)) })
}

/// Kinds of services the bridge asks the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// Static accessory metadata.
    AccessoryInformation,
    /// Stateful on/off toggle.
    Switch,
    /// Temperature reading.
    TemperatureSensor,
    /// Relative humidity reading.
    HumiditySensor,
    /// Television with a remote control.
    Television,
    /// Media target/current state.
    SmartSpeaker,
}

/// Characteristics the bridge reads, writes or sets statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Manufacturer string.
    Manufacturer,
    /// Model string.
    Model,
    /// Display name.
    Name,
    /// User visible name on television services.
    ConfiguredName,
    /// Firmware revision string.
    FirmwareRevision,
    /// Software revision string.
    SoftwareRevision,
    /// Switch state.
    On,
    /// Temperature in degrees Celsius.
    CurrentTemperature,
    /// Relative humidity in percent.
    CurrentRelativeHumidity,
    /// Television active state (`0`/`1`).
    Active,
    /// Remote key press.
    RemoteKey,
    /// Requested media state.
    TargetMediaState,
    /// Reported media state.
    CurrentMediaState,
}

/// A characteristic value as exchanged with the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value, used for enumerations.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Text(String),
}

impl CharacteristicValue {
    /// Interprets the value as a boolean. Unknown text is `false`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => truthy(&serde_json::Value::from(s.as_str())).unwrap_or(false),
        }
    }

    /// Returns the value as an integer, if it is numeric.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the value as a float, if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Returns the value as a string slice, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A service handle owned by the host framework.
pub trait HostService: Send + Sync {
    /// Returns the kind the service was created with.
    fn kind(&self) -> ServiceKind;

    /// Sets a characteristic value.
    ///
    /// Used both for static metadata and for pushing state changes that did
    /// not originate from the host (auto-reverting buttons).
    fn set_value(&self, characteristic: Characteristic, value: CharacteristicValue);

    /// Registers the read handler of a characteristic.
    fn on_get(&self, characteristic: Characteristic, handler: GetHandler);

    /// Registers the write handler of a characteristic.
    fn on_set(&self, characteristic: Characteristic, handler: SetHandler);
}

/// Creates services on behalf of the bridge.
pub trait ServiceFactory: Send + Sync {
    /// Creates a named service. `subtype` disambiguates several services of
    /// the same kind within one accessory.
    fn create_service(
        &self,
        kind: ServiceKind,
        name: &str,
        subtype: Option<&str>,
    ) -> Arc<dyn HostService>;
}
