// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles for the transport and the host framework.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::accessory::{
    Characteristic, CharacteristicValue, GetHandler, HostService, ServiceFactory, ServiceKind,
    SetHandler,
};
use crate::error::ProtocolError;
use crate::protocol::Transport;

enum Reply {
    Ok(Value),
    Err(String),
}

/// Transport replaying queued replies and recording every request.
///
/// Once the queue is empty every call answers with the fallback reply
/// (`{}` unless changed).
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Value>,
    calls: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(json!({})),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_fallback(self, reply: Value) -> Self {
        *self.fallback.lock() = reply;
        self
    }

    pub(crate) fn push_ok(&self, reply: Value) {
        self.replies.lock().push_back(Reply::Ok(reply));
    }

    pub(crate) fn push_err(&self, message: &str) {
        self.replies.lock().push_back(Reply::Err(message.to_string()));
    }

    pub(crate) fn calls(&self) -> Vec<Value> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Transport for ScriptedTransport {
    async fn call(&self, command: &Value) -> Result<Value, ProtocolError> {
        self.calls.lock().push(command.clone());
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Err(message)) => Err(ProtocolError::ConnectionFailed(message)),
            None => Ok(self.fallback.lock().clone()),
        }
    }
}

/// Host service storing values and handlers in memory.
pub(crate) struct RecordingService {
    kind: ServiceKind,
    name: String,
    subtype: Option<String>,
    values: Mutex<HashMap<Characteristic, CharacteristicValue>>,
    getters: Mutex<HashMap<Characteristic, GetHandler>>,
    setters: Mutex<HashMap<Characteristic, SetHandler>>,
}

impl RecordingService {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Last value set through [`HostService::set_value`].
    pub(crate) fn value(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.values.lock().get(&characteristic).cloned()
    }

    /// Invokes the registered read handler.
    pub(crate) async fn get(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        let handler = self.getters.lock().get(&characteristic).cloned()?;
        Some(handler().await)
    }

    /// Invokes the registered write handler. Returns `false` if none exists.
    pub(crate) async fn set(
        &self,
        characteristic: Characteristic,
        value: impl Into<CharacteristicValue>,
    ) -> bool {
        let handler = self.setters.lock().get(&characteristic).cloned();
        match handler {
            Some(handler) => {
                handler(value.into()).await;
                true
            }
            None => false,
        }
    }
}

impl HostService for RecordingService {
    fn kind(&self) -> ServiceKind {
        self.kind
    }

    fn set_value(&self, characteristic: Characteristic, value: CharacteristicValue) {
        self.values.lock().insert(characteristic, value);
    }

    fn on_get(&self, characteristic: Characteristic, handler: GetHandler) {
        self.getters.lock().insert(characteristic, handler);
    }

    fn on_set(&self, characteristic: Characteristic, handler: SetHandler) {
        self.setters.lock().insert(characteristic, handler);
    }
}

/// Factory handing out [`RecordingService`]s and remembering them.
#[derive(Default)]
pub(crate) struct RecordingFactory {
    services: Mutex<Vec<Arc<RecordingService>>>,
}

impl RecordingFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn services(&self) -> Vec<Arc<RecordingService>> {
        self.services.lock().clone()
    }

    /// First service of `kind`, optionally matching `subtype`.
    pub(crate) fn find(
        &self,
        kind: ServiceKind,
        subtype: Option<&str>,
    ) -> Option<Arc<RecordingService>> {
        self.services
            .lock()
            .iter()
            .find(|s| s.kind == kind && (subtype.is_none() || s.subtype() == subtype))
            .cloned()
    }
}

impl ServiceFactory for RecordingFactory {
    fn create_service(
        &self,
        kind: ServiceKind,
        name: &str,
        subtype: Option<&str>,
    ) -> Arc<dyn HostService> {
        let service = Arc::new(RecordingService {
            kind,
            name: name.to_string(),
            subtype: subtype.map(str::to_string),
            values: Mutex::new(HashMap::new()),
            getters: Mutex::new(HashMap::new()),
            setters: Mutex::new(HashMap::new()),
        });
        self.services.lock().push(Arc::clone(&service));
        service
    }
}
