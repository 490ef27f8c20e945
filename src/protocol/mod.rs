// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the display's single JSON endpoint.
//!
//! The display exposes one HTTP endpoint (`/api/v3/basics` by default) that
//! accepts a flat JSON object and answers with JSON. The [`Transport`] trait
//! captures that contract; [`HttpClient`] is the production implementation.
//!
//! No layer retries. A failed call is reported once and the next scheduled or
//! user-triggered call acts as the retry.

mod http;

pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use serde_json::Value;

use crate::command::Command;
use crate::error::ProtocolError;

/// Something that can deliver a JSON command to the display.
///
/// Implementations must perform exactly one attempt per call. The command
/// vocabulary belongs to the callers; the transport does not validate it.
pub trait Transport: Send + Sync {
    /// Sends a raw JSON command and returns the decoded reply.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be delivered, times out,
    /// or the device answers with a non-success status.
    fn call(&self, command: &Value) -> impl Future<Output = Result<Value, ProtocolError>> + Send;

    /// Sends a typed command.
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call).
    fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> impl Future<Output = Result<Value, ProtocolError>> + Send {
        let body = command.to_json();
        async move { self.call(&body).await }
    }
}
