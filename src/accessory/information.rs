// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory information service.

use std::sync::Arc;

use crate::dispatcher::CommandDispatcher;
use crate::protocol::Transport;
use crate::telemetry::{DeviceSnapshot, TelemetryCache};

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
};

/// Static identification plus the two revision strings of the display.
///
/// The firmware revision comes from the telemetry snapshot, the software
/// revision from a live `version` query. Both read [`DeviceSnapshot::UNKNOWN_VERSION`] when
/// the device has not told us.
pub struct InformationService<P> {
    name: String,
    dispatcher: CommandDispatcher<P>,
    cache: Arc<TelemetryCache>,
}

impl<P: Transport + 'static> InformationService<P> {
    /// Manufacturer reported to the host.
    pub const MANUFACTURER: &'static str = "Blueforcer";
    /// Model reported to the host.
    pub const MODEL: &'static str = "Awtrix";

    /// Creates the projection.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dispatcher: CommandDispatcher<P>,
        cache: Arc<TelemetryCache>,
    ) -> Self {
        Self {
            name: name.into(),
            dispatcher,
            cache,
        }
    }

    /// Firmware revision from the cached snapshot.
    #[must_use]
    pub fn firmware_revision(&self) -> String {
        self.cache.read().firmware_version_or_unknown().to_string()
    }

    /// Software revision queried from the device.
    pub async fn software_revision(&self) -> String {
        match self.dispatcher.version().await {
            Ok(Some(version)) => version,
            Ok(None) => DeviceSnapshot::UNKNOWN_VERSION.to_string(),
            Err(e) => {
                tracing::error!(accessory = %self.name, error = %e, "Error during version query");
                DeviceSnapshot::UNKNOWN_VERSION.to_string()
            }
        }
    }

    /// Creates the information service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(ServiceKind::AccessoryInformation, &self.name, None);
        service.set_value(Characteristic::Manufacturer, Self::MANUFACTURER.into());
        service.set_value(Characteristic::Model, Self::MODEL.into());
        service.set_value(Characteristic::Name, self.name.as_str().into());

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::FirmwareRevision,
            get_handler(move || {
                let revision = this.firmware_revision();
                async move { CharacteristicValue::Text(revision) }
            }),
        );

        let this = self;
        service.on_get(
            Characteristic::SoftwareRevision,
            get_handler(move || {
                let this = Arc::clone(&this);
                async move { CharacteristicValue::Text(this.software_revision().await) }
            }),
        );

        service
    }
}
