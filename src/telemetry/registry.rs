// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One telemetry cache per device endpoint.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::protocol::Transport;

use super::TelemetryCache;

/// Registry sharing telemetry caches between accessories.
///
/// The registry keeps at most one live cache per endpoint URL. Caches are
/// held weakly: once every accessory drops its handle, the polling task stops
/// and the next request for that endpoint starts a fresh one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use awtrix_bridge::protocol::HttpClient;
/// use awtrix_bridge::telemetry::TelemetryRegistry;
///
/// # #[tokio::main]
/// # async fn main() -> awtrix_bridge::Result<()> {
/// let registry = TelemetryRegistry::new();
/// let client = Arc::new(HttpClient::new("192.168.1.60")?);
///
/// let a = registry.get_or_start(client.endpoint(), client.clone(), Duration::from_secs(30));
/// let b = registry.get_or_start(client.endpoint(), client.clone(), Duration::from_secs(30));
/// assert!(Arc::ptr_eq(&a, &b));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TelemetryRegistry {
    caches: Mutex<HashMap<String, Weak<TelemetryCache>>>,
}

impl TelemetryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live cache for `endpoint`, starting one if needed.
    ///
    /// `transport` and `interval` are only used when a new cache is started.
    ///
    /// # Panics
    ///
    /// Panics if a cache has to be started outside of a Tokio runtime.
    pub fn get_or_start<P>(
        &self,
        endpoint: &str,
        transport: Arc<P>,
        interval: Duration,
    ) -> Arc<TelemetryCache>
    where
        P: Transport + 'static,
    {
        let mut caches = self.caches.lock();
        caches.retain(|_, cache| cache.strong_count() > 0);

        if let Some(cache) = caches.get(endpoint).and_then(Weak::upgrade) {
            tracing::debug!(endpoint, "Reusing telemetry cache");
            return cache;
        }

        let cache = TelemetryCache::start(endpoint, transport, interval);
        caches.insert(endpoint.to_string(), Arc::downgrade(&cache));
        cache
    }

    /// Returns the live cache for `endpoint`, if any.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> Option<Arc<TelemetryCache>> {
        self.caches.lock().get(endpoint).and_then(Weak::upgrade)
    }

    /// Returns the number of live caches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.caches
            .lock()
            .values()
            .filter(|cache| cache.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no cache is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
