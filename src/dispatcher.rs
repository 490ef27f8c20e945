// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch.
//!
//! The [`CommandDispatcher`] is stateless: every operation results in exactly
//! one transport call, with no queuing, coalescing or ordering across
//! concurrent calls. The display serializes its own command handling.

use std::sync::Arc;

use serde_json::Value;

use crate::command::{AppCommand, Command, Operation, Query};
use crate::error::{DeviceError, Error, ProtocolError};
use crate::protocol::Transport;
use crate::response::{
    CommandAck, PowerStateResponse, VersionResponse, is_pause_confirmation, parse_object,
};

/// Outcome of a dispatched command.
///
/// `succeeded == false` with no error means the device answered but did not
/// acknowledge the command. A transport or parse failure carries the error.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the device acknowledged the command.
    pub succeeded: bool,
    /// The failure, when the exchange itself failed.
    pub error: Option<Error>,
}

impl CommandResult {
    /// The device acknowledged the command.
    #[must_use]
    pub fn success() -> Self {
        Self {
            succeeded: true,
            error: None,
        }
    }

    /// The device answered without acknowledging.
    #[must_use]
    pub fn rejected() -> Self {
        Self {
            succeeded: false,
            error: None,
        }
    }

    /// The exchange failed.
    #[must_use]
    pub fn failed(error: impl Into<Error>) -> Self {
        Self {
            succeeded: false,
            error: Some(error.into()),
        }
    }

    /// Converts into a `Result`, turning a rejection into
    /// [`DeviceError::CommandRejected`].
    ///
    /// # Errors
    ///
    /// Returns the attached error, or `CommandRejected` naming `operation`.
    pub fn into_result(self, operation: &Operation) -> Result<(), Error> {
        match (self.succeeded, self.error) {
            (true, _) => Ok(()),
            (false, Some(error)) => Err(error),
            (false, None) => Err(DeviceError::CommandRejected(format!(
                "{}={}",
                operation.key(),
                operation.value()
            ))
            .into()),
        }
    }
}

/// Issues commands and queries against one display.
pub struct CommandDispatcher<P> {
    transport: Arc<P>,
}

impl<P> Clone for CommandDispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<P> std::fmt::Debug for CommandDispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher").finish_non_exhaustive()
    }
}

impl<P: Transport> CommandDispatcher<P> {
    /// Creates a dispatcher over `transport`.
    #[must_use]
    pub fn new(transport: Arc<P>) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<P> {
        &self.transport
    }

    /// Sends a "set" style operation and classifies the reply.
    pub async fn send(&self, operation: impl Into<Operation>) -> CommandResult {
        let operation = operation.into();
        let kind = operation.kind();

        match self.transport.send_command(&operation).await {
            Ok(reply) => {
                if CommandAck::from_reply(&reply).is_success() {
                    tracing::debug!(operation = %kind, value = %operation.value(), "Command acknowledged");
                    CommandResult::success()
                } else {
                    tracing::warn!(operation = %kind, value = %operation.value(), reply = %reply, "Command not acknowledged");
                    CommandResult::rejected()
                }
            }
            Err(e) => {
                tracing::warn!(operation = %kind, value = %operation.value(), error = %e, "Command failed");
                CommandResult::failed(e)
            }
        }
    }

    /// Sends a raw JSON command, returning the decoded reply.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the exchange fails.
    pub async fn call_raw(&self, command: &Value) -> Result<Value, ProtocolError> {
        self.transport.call(command).await
    }

    /// Queries whether the matrix is on.
    ///
    /// Returns `Ok(None)` when the reply has no usable `powerState`.
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails or the reply is not an object.
    pub async fn power_state(&self) -> Result<Option<bool>, Error> {
        let reply = self.transport.send_command(&Query::PowerState).await?;
        let response: PowerStateResponse = parse_object(&reply)?;
        Ok(response.is_on())
    }

    /// Queries the software version.
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails or the reply is not an object.
    pub async fn version(&self) -> Result<Option<String>, Error> {
        let reply = self.transport.send_command(&Query::Version).await?;
        let response: VersionResponse = parse_object(&reply)?;
        Ok(response.version)
    }

    /// Pauses the app loop.
    ///
    /// Returns `true` only if the device answered with the literal pause
    /// confirmation; any other reply means the loop is running.
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails.
    pub async fn pause_app_loop(&self) -> Result<bool, Error> {
        let reply = self.transport.send_command(&AppCommand::Pause).await?;
        Ok(is_pause_confirmation(&reply))
    }
}
