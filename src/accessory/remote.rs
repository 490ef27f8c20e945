// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote control projection.
//!
//! Exposes the display as a television so the host's remote widget can drive
//! the app loop. Key presses map onto fixed commands:
//!
//! | Key | Command |
//! |-----|---------|
//! | Arrow left, Back | `{"app":"back"}` |
//! | Arrow right | `{"app":"next"}` |
//! | Play/Pause | `{"app":"pause"}` |
//! | Information | `{"showAnimation":"random"}` |
//! | Select | `{"timer":"<duration>"}` or `{"timer":"stop"}` |

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::{AnimationCommand, AppCommand, Operation, TimerCommand};
use crate::dispatcher::{CommandDispatcher, CommandResult};
use crate::protocol::Transport;

use super::host::{
    Characteristic, CharacteristicValue, HostService, ServiceFactory, ServiceKind, get_handler,
    set_handler,
};
use super::power::PowerSwitch;

/// Remote keys as numbered by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKey {
    /// Code 0.
    Rewind,
    /// Code 1.
    FastForward,
    /// Code 2.
    NextTrack,
    /// Code 3.
    PreviousTrack,
    /// Code 4.
    ArrowUp,
    /// Code 5.
    ArrowDown,
    /// Code 6, previous app.
    ArrowLeft,
    /// Code 7, next app.
    ArrowRight,
    /// Code 8, timer start/stop.
    Select,
    /// Code 9, previous app.
    Back,
    /// Code 10.
    Exit,
    /// Code 11, pause the app loop.
    PlayPause,
    /// Code 15, random animation.
    Information,
}

impl RemoteKey {
    /// Decodes a key code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Rewind,
            1 => Self::FastForward,
            2 => Self::NextTrack,
            3 => Self::PreviousTrack,
            4 => Self::ArrowUp,
            5 => Self::ArrowDown,
            6 => Self::ArrowLeft,
            7 => Self::ArrowRight,
            8 => Self::Select,
            9 => Self::Back,
            10 => Self::Exit,
            11 => Self::PlayPause,
            15 => Self::Information,
            _ => return None,
        })
    }

    /// Returns the key code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Rewind => 0,
            Self::FastForward => 1,
            Self::NextTrack => 2,
            Self::PreviousTrack => 3,
            Self::ArrowUp => 4,
            Self::ArrowDown => 5,
            Self::ArrowLeft => 6,
            Self::ArrowRight => 7,
            Self::Select => 8,
            Self::Back => 9,
            Self::Exit => 10,
            Self::PlayPause => 11,
            Self::Information => 15,
        }
    }
}

/// What a remote key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// Fixed app navigation.
    App(AppCommand),
    /// Random animation.
    RandomAnimation,
    /// Start the configured timer, or stop the running one.
    ToggleTimer,
}

const KEY_MAP: &[(RemoteKey, RemoteAction)] = &[
    (RemoteKey::ArrowLeft, RemoteAction::App(AppCommand::Back)),
    (RemoteKey::Back, RemoteAction::App(AppCommand::Back)),
    (RemoteKey::ArrowRight, RemoteAction::App(AppCommand::Next)),
    (RemoteKey::PlayPause, RemoteAction::App(AppCommand::Pause)),
    (RemoteKey::Information, RemoteAction::RandomAnimation),
    (RemoteKey::Select, RemoteAction::ToggleTimer),
];

/// Looks up the action bound to `key`.
#[must_use]
pub fn action_for(key: RemoteKey) -> Option<RemoteAction> {
    KEY_MAP
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, action)| *action)
}

/// Timer duration used when none is configured.
pub const DEFAULT_TIMER_DURATION: &str = "10m";

/// Television-style remote for the display.
pub struct RemoteControl<P> {
    name: String,
    dispatcher: CommandDispatcher<P>,
    power: PowerSwitch<P>,
    timer_duration: String,
    timer_running: AtomicBool,
}

impl<P: Transport + 'static> RemoteControl<P> {
    /// Creates the projection.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dispatcher: CommandDispatcher<P>,
        timer_duration: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            power: PowerSwitch::new(name.clone(), dispatcher.clone()),
            name,
            dispatcher,
            timer_duration: timer_duration.into(),
            timer_running: AtomicBool::new(false),
        }
    }

    /// Returns whether a timer started from this remote is believed running.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer_running.load(Ordering::Acquire)
    }

    /// Handles a key press.
    ///
    /// Returns `None` for keys without a binding. The timer flag flips only
    /// when the device acknowledges the timer command.
    pub async fn press(&self, key: RemoteKey) -> Option<CommandResult> {
        let Some(action) = action_for(key) else {
            tracing::debug!(accessory = %self.name, ?key, "Ignoring unmapped remote key");
            return None;
        };

        tracing::debug!(accessory = %self.name, ?key, ?action, "Remote key pressed");

        let operation: Operation = match action {
            RemoteAction::App(cmd) => cmd.into(),
            RemoteAction::RandomAnimation => AnimationCommand::Random.into(),
            RemoteAction::ToggleTimer => {
                if self.timer_running() {
                    TimerCommand::Stop.into()
                } else {
                    TimerCommand::start(self.timer_duration.as_str()).into()
                }
            }
        };

        let result = self.dispatcher.send(operation.clone()).await;

        if result.succeeded {
            if action == RemoteAction::ToggleTimer {
                let running = matches!(operation, Operation::Timer(TimerCommand::Start(_)));
                self.timer_running.store(running, Ordering::Release);
            }
        } else {
            match &result.error {
                Some(e) => tracing::error!(
                    accessory = %self.name,
                    operation = %operation.kind(),
                    error = %e,
                    "Error during remote key {key:?}"
                ),
                None => tracing::error!(
                    accessory = %self.name,
                    operation = %operation.kind(),
                    "Error during remote key {key:?}"
                ),
            }
        }

        Some(result)
    }

    async fn press_code(&self, code: Option<i64>) {
        match code.and_then(RemoteKey::from_code) {
            Some(key) => {
                self.press(key).await;
            }
            None => tracing::debug!(accessory = %self.name, ?code, "Unknown remote key code"),
        }
    }

    /// Creates the television service and registers its handlers.
    pub fn bind(self: Arc<Self>, factory: &dyn ServiceFactory) -> Arc<dyn HostService> {
        let service = factory.create_service(ServiceKind::Television, &self.name, None);
        service.set_value(Characteristic::ConfiguredName, self.name.as_str().into());

        let this = Arc::clone(&self);
        service.on_get(
            Characteristic::Active,
            get_handler(move || {
                let this = Arc::clone(&this);
                async move { CharacteristicValue::Int(i64::from(this.power.is_on().await)) }
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

        let this = self;
        service.on_set(
            Characteristic::RemoteKey,
            set_handler(move |value| {
                let this = Arc::clone(&this);
                async move { this.press_code(value.as_i64()).await }
            }),
        );

        service
    }
}
