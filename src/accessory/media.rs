// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Media state projection.
//!
//! Surfaces app navigation as a smart speaker with target and current media
//! states. Play and pause both send `{"app":"pause"}`, which toggles the
//! device's app rotation. Stop advances to the next app, but only while the
//! current state is play.
//!
//! The current state is never polled; it is derived from power reads.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::command::AppCommand;
use crate::dispatcher::{CommandDispatcher, CommandResult};
use crate::protocol::Transport;

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
    set_handler,
};
use super::power::PowerSwitch;

/// Requested media state, numbered as the host framework does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetMediaState {
    /// Code 0.
    Play,
    /// Code 1.
    Pause,
    /// Code 2.
    Stop,
}

impl TargetMediaState {
    /// Decodes a host value.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Play),
            1 => Some(Self::Pause),
            2 => Some(Self::Stop),
            _ => None,
        }
    }

    /// Returns the host value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Play => 0,
            Self::Pause => 1,
            Self::Stop => 2,
        }
    }
}

/// Reported media state, numbered as the host framework does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentMediaState {
    /// Code 0, the display is on.
    Play,
    /// Code 1.
    Pause,
    /// Code 4.
    Loading,
    /// Code 5, the display is off or unreachable.
    Interrupted,
}

impl CurrentMediaState {
    /// Returns the host value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Play => 0,
            Self::Pause => 1,
            Self::Loading => 4,
            Self::Interrupted => 5,
        }
    }

    /// Current state implied by the power state.
    #[must_use]
    pub const fn from_power(on: bool) -> Self {
        if on { Self::Play } else { Self::Interrupted }
    }
}

#[derive(Debug, Clone, Copy)]
struct MediaState {
    target: TargetMediaState,
    current: CurrentMediaState,
}

/// Speaker-style media control for the display.
pub struct MediaControl<P> {
    name: String,
    dispatcher: CommandDispatcher<P>,
    power: PowerSwitch<P>,
    state: Mutex<MediaState>,
    service: OnceLock<Arc<dyn HostService>>,
}

impl<P: Transport + 'static> MediaControl<P> {
    /// Creates the projection. Target starts at stop, current at interrupted.
    #[must_use]
    pub fn new(name: impl Into<String>, dispatcher: CommandDispatcher<P>) -> Self {
        let name = name.into();
        Self {
            power: PowerSwitch::new(name.clone(), dispatcher.clone()),
            name,
            dispatcher,
            state: Mutex::new(MediaState {
                target: TargetMediaState::Stop,
                current: CurrentMediaState::Interrupted,
            }),
            service: OnceLock::new(),
        }
    }

    /// Returns the last requested target state.
    #[must_use]
    pub fn target(&self) -> TargetMediaState {
        self.state.lock().target
    }

    /// Returns the last derived current state.
    #[must_use]
    pub fn current(&self) -> CurrentMediaState {
        self.state.lock().current
    }

    /// Applies a new target state.
    ///
    /// Returns `None` when no command was needed.
    pub async fn set_target(&self, target: TargetMediaState) -> Option<CommandResult> {
        let current = {
            let mut state = self.state.lock();
            state.target = target;
            state.current
        };

        let command = match target {
            TargetMediaState::Play | TargetMediaState::Pause => AppCommand::Pause,
            TargetMediaState::Stop if current == CurrentMediaState::Play => AppCommand::Next,
            TargetMediaState::Stop => {
                tracing::debug!(accessory = %self.name, ?current, "Stop ignored while not playing");
                return None;
            }
        };

        tracing::debug!(accessory = %self.name, ?target, "Setting media target");
        let result = self.dispatcher.send(command).await;
        if !result.succeeded {
            match &result.error {
                Some(e) => tracing::error!(
                    accessory = %self.name,
                    error = %e,
                    "Error during setting the media state to {target:?}"
                ),
                None => tracing::error!(
                    accessory = %self.name,
                    "Error during setting the media state to {target:?}"
                ),
            }
        }
        Some(result)
    }

    /// Reads the power state and derives the current media state from it.
    pub async fn refresh_power(&self) -> bool {
        let on = self.power.is_on().await;
        let current = CurrentMediaState::from_power(on);
        self.state.lock().current = current;
        if let Some(service) = self.service.get() {
            service.set_value(Characteristic::CurrentMediaState, current.code().into());
        }
        on
    }

    /// Creates the speaker service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(ServiceKind::SmartSpeaker, &self.name, None);
        service.set_value(Characteristic::ConfiguredName, self.name.as_str().into());
        if self.service.set(Arc::clone(&service)).is_err() {
            tracing::debug!(accessory = %self.name, "Media control already bound");
        }

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::Active,
            get_handler(move || {
                let this = Arc::clone(&this);
                async move { CharacteristicValue::Int(i64::from(this.refresh_power().await)) }
            }),
        );

        let this = Arc::clone(&self);
        service.on_set(
            Characteristic::Active,
            set_handler(move |value| {
                let this = Arc::clone(&this);
                async move { this.power.set_on(value.as_bool()).await }
            }),
        );

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::TargetMediaState,
            get_handler(move || {
                let code = this.target().code();
                async move { CharacteristicValue::Int(code) }
            }),
        );

        let this = Arc::clone(&self);
        service.on_set(
            Characteristic::TargetMediaState,
            set_handler(move |value| {
                let this = Arc::clone(&this);
                async move {
                    match value.as_i64().and_then(TargetMediaState::from_code) {
                        Some(target) => {
                            this.set_target(target).await;
                        }
                        None => tracing::debug!(
                            accessory = %this.name,
                            ?value,
                            "Unknown target media state"
                        ),
                    }
                }
            }),
        );

        let this = self;
        service.on_get(
            Characteristic::CurrentMediaState,
            get_handler(move || {
                let code = this.current().code();
                async move { CharacteristicValue::Int(code) }
            }),
        );

        service
    }
}
