// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power switch projection.

use std::sync::Arc;

use crate::command::PowerCommand;
use crate::dispatcher::CommandDispatcher;
use crate::protocol::Transport;

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
    set_handler,
};

/// The display's main on/off switch.
///
/// Reads query `powerState` directly (power is not part of telemetry). Any
/// failure reads as off. Writes are not rolled back on failure; the host may
/// show a state that differs from the device until the next read.
pub struct PowerSwitch<P> {
    name: String,
    dispatcher: CommandDispatcher<P>,
}

impl<P: Transport + 'static> PowerSwitch<P> {
    /// Service subtype of the switch.
    pub const SUBTYPE: &'static str = "On";

    /// Creates the projection.
    #[must_use]
    pub fn new(name: impl Into<String>, dispatcher: CommandDispatcher<P>) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    /// Reads the power state, `false` on any failure.
    pub async fn is_on(&self) -> bool {
        match self.dispatcher.power_state().await {
            Ok(Some(on)) => on,
            Ok(None) => {
                tracing::warn!(accessory = %self.name, "Power state query returned no powerState");
                false
            }
            Err(e) => {
                tracing::error!(accessory = %self.name, error = %e, "Error during power state query");
                false
            }
        }
    }

    /// Switches the matrix on or off. Failures are logged only.
    pub async fn set_on(&self, on: bool) {
        tracing::debug!(accessory = %self.name, on, "Setting power");
        let result = self.dispatcher.send(PowerCommand::from(on)).await;
        if !result.succeeded {
            match result.error {
                Some(e) => tracing::error!(
                    accessory = %self.name,
                    error = %e,
                    "Error during setting the power state to {on}"
                ),
                None => tracing::error!(
                    accessory = %self.name,
                    "Error during setting the power state to {on}"
                ),
            }
        }
    }

    /// Creates the switch service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(ServiceKind::Switch, &self.name, Some(Self::SUBTYPE));
        service.set_value(Characteristic::Name, "On/Off".into());

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::On,
            get_handler(move || {
                let this = Arc::clone(&this);
                async move { CharacteristicValue::Bool(this.is_on().await) }
            }),
        );

        let this = self;
        service.on_set(
            Characteristic::On,
            set_handler(move |value| {
                let this = Arc::clone(&this);
                async move { this.set_on(value.as_bool()).await }
            }),
        );

        service
    }
}
