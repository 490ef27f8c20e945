// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory host framework used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use awtrix_bridge::accessory::{
    Characteristic, CharacteristicValue, GetHandler, HostService, ServiceFactory, ServiceKind,
    SetHandler,
};
use parking_lot::Mutex;

/// A service that stores values and handlers in memory.
pub struct MemoryService {
    kind: ServiceKind,
    name: String,
    subtype: Option<String>,
    values: Mutex<HashMap<Characteristic, CharacteristicValue>>,
    getters: Mutex<HashMap<Characteristic, GetHandler>>,
    setters: Mutex<HashMap<Characteristic, SetHandler>>,
}

impl MemoryService {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.values.lock().get(&characteristic).cloned()
    }

    /// Runs the read handler the way the host would on a characteristic read.
    pub async fn read(&self, characteristic: Characteristic) -> CharacteristicValue {
        let handler = self
            .getters
            .lock()
            .get(&characteristic)
            .cloned()
            .unwrap_or_else(|| panic!("no read handler for {characteristic:?}"));
        handler().await
    }

    /// Runs the write handler the way the host would on a characteristic write.
    pub async fn write(&self, characteristic: Characteristic, value: impl Into<CharacteristicValue>) {
        let handler = self
            .setters
            .lock()
            .get(&characteristic)
            .cloned()
            .unwrap_or_else(|| panic!("no write handler for {characteristic:?}"));
        handler(value.into()).await;
    }
}

impl HostService for MemoryService {
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

#[derive(Default)]
pub struct MemoryHost {
    services: Mutex<Vec<Arc<MemoryService>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a service by kind and subtype, panicking if absent.
    pub fn service(&self, kind: ServiceKind, subtype: Option<&str>) -> Arc<MemoryService> {
        self.services
            .lock()
            .iter()
            .find(|s| s.kind == kind && s.subtype.as_deref() == subtype)
            .cloned()
            .unwrap_or_else(|| panic!("no {kind:?} service with subtype {subtype:?}"))
    }
}

impl ServiceFactory for MemoryHost {
    fn create_service(
        &self,
        kind: ServiceKind,
        name: &str,
        subtype: Option<&str>,
    ) -> Arc<dyn HostService> {
        let service = Arc::new(MemoryService {
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
