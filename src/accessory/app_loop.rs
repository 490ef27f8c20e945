// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! App loop pause switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatcher::CommandDispatcher;
use crate::protocol::Transport;

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
    set_handler,
};

/// Switch pausing the display's automatic app rotation.
///
/// Any write sends `{"app":"pause"}`. The hold flag follows the literal reply
/// text of the device, never a polled value.
pub struct AppLoopSwitch<P> {
    name: String,
    dispatcher: CommandDispatcher<P>,
    on_hold: AtomicBool,
}

impl<P: Transport + 'static> AppLoopSwitch<P> {
    /// Service subtype of the switch.
    pub const SUBTYPE: &'static str = "AppLoop";

    /// Creates the projection.
    #[must_use]
    pub fn new(name: impl Into<String>, dispatcher: CommandDispatcher<P>) -> Self {
        Self {
            name: name.into(),
            dispatcher,
            on_hold: AtomicBool::new(false),
        }
    }

    /// Returns whether the app loop is paused, as last reported.
    #[must_use]
    pub fn is_on_hold(&self) -> bool {
        self.on_hold.load(Ordering::Acquire)
    }

    /// Sends the pause command and updates the hold flag from the reply.
    ///
    /// A failed exchange is logged and leaves the flag unchanged.
    pub async fn toggle(&self) {
        tracing::debug!(accessory = %self.name, "Pausing app loop");
        match self.dispatcher.pause_app_loop().await {
            Ok(held) => self.on_hold.store(held, Ordering::Release),
            Err(e) => {
                tracing::error!(accessory = %self.name, error = %e, "Error during pausing app loop");
            }
        }
    }

    /// Creates the switch service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(ServiceKind::Switch, &self.name, Some(Self::SUBTYPE));
        service.set_value(Characteristic::Name, Self::SUBTYPE.into());

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::On,
            get_handler(move || {
                let held = this.is_on_hold();
                async move { CharacteristicValue::Bool(held) }
            }),
        );

        let this = self;
        service.on_set(
            Characteristic::On,
            set_handler(move |_value| {
                let this = Arc::clone(&this);
                async move { this.toggle().await }
            }),
        );

        service
    }
}
