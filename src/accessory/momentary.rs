// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push buttons emulated on top of stateful switches.
//!
//! The display has no durable "on" state for playing an animation or skipping
//! to the next app. The projection shows the switch as on while the action is
//! fresh and flips it back after [`MomentaryButton::DEFAULT_REVERT_DELAY`],
//! whether or not the command succeeded.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::command::{AnimationCommand, AppCommand, Operation};
use crate::dispatcher::CommandDispatcher;
use crate::protocol::Transport;

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
    set_handler,
};

#[derive(Debug, Default)]
struct MomentaryState {
    active: bool,
    pending_revert: Option<JoinHandle<()>>,
}

/// A switch that fires one command and reverts to off.
pub struct MomentaryButton<P> {
    name: String,
    subtype: &'static str,
    operation: Operation,
    dispatcher: CommandDispatcher<P>,
    revert_after: Duration,
    state: Arc<Mutex<MomentaryState>>,
    service: OnceLock<Arc<dyn HostService>>,
}

impl<P: Transport + 'static> MomentaryButton<P> {
    /// Delay after which the switch flips back to off.
    pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(250);

    /// Creates a button sending `operation` when switched on.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        subtype: &'static str,
        operation: impl Into<Operation>,
        dispatcher: CommandDispatcher<P>,
    ) -> Self {
        Self {
            name: name.into(),
            subtype,
            operation: operation.into(),
            dispatcher,
            revert_after: Self::DEFAULT_REVERT_DELAY,
            state: Arc::new(Mutex::new(MomentaryState::default())),
            service: OnceLock::new(),
        }
    }

    /// Button playing a random animation.
    #[must_use]
    pub fn animation(name: impl Into<String>, dispatcher: CommandDispatcher<P>) -> Self {
        Self::new(name, "Animation", AnimationCommand::Random, dispatcher)
    }

    /// Button switching to the next app.
    #[must_use]
    pub fn next_app(name: impl Into<String>, dispatcher: CommandDispatcher<P>) -> Self {
        Self::new(name, "Next", AppCommand::Next, dispatcher)
    }

    /// Overrides the revert delay.
    #[must_use]
    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_after = delay;
        self
    }

    /// Returns the service subtype, also used as the visible name.
    #[must_use]
    pub fn subtype(&self) -> &'static str {
        self.subtype
    }

    /// Returns the operation fired by the button.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Returns the locally held switch state. Never queries the device.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Applies a write from the host.
    ///
    /// Switching on schedules the revert first and then sends the command, so
    /// the revert happens regardless of the command outcome. A repeated press
    /// replaces the pending revert.
    pub async fn set_active(&self, active: bool) {
        self.state.lock().active = active;
        if !active {
            return;
        }

        tracing::debug!(accessory = %self.name, button = self.subtype, "Button pressed");
        self.schedule_revert();

        let result = self.dispatcher.send(self.operation.clone()).await;
        if !result.succeeded {
            match result.error {
                Some(e) => tracing::error!(
                    accessory = %self.name,
                    operation = %self.operation.kind(),
                    error = %e,
                    "Error during {} button action",
                    self.subtype
                ),
                None => tracing::error!(
                    accessory = %self.name,
                    operation = %self.operation.kind(),
                    "Error during {} button action",
                    self.subtype
                ),
            }
        }
    }

    fn schedule_revert(&self) {
        let state = Arc::clone(&self.state);
        let service = self.service.get().cloned();
        let delay = self.revert_after;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.lock().active = false;
            if let Some(service) = service {
                service.set_value(Characteristic::On, CharacteristicValue::Bool(false));
            }
        });

        if let Some(previous) = self.state.lock().pending_revert.replace(handle) {
            previous.abort();
        }
    }

    /// Creates the switch service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service =
            factory.create_service(ServiceKind::Switch, &self.name, Some(self.subtype));
        service.set_value(Characteristic::Name, self.subtype.into());
        if self.service.set(Arc::clone(&service)).is_err() {
            tracing::debug!(
                accessory = %self.name,
                button = self.subtype,
                "Button already bound, reverts go to the first service"
            );
        }

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::On,
            get_handler(move || {
                let active = this.is_active();
                async move { CharacteristicValue::Bool(active) }
            }),
        );

        let this = self;
        service.on_set(
            Characteristic::On,
            set_handler(move |value| {
                let this = Arc::clone(&this);
                async move { this.set_active(value.as_bool()).await }
            }),
        );

        service
    }
}
