// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background telemetry polling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::command::Query;
use crate::protocol::Transport;
use crate::response::{MatrixInfoResponse, parse_object};

use super::DeviceSnapshot;

/// Result of a single poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A non-empty reply was applied to the snapshot.
    Updated,
    /// The reply carried no recognized field; the snapshot was kept.
    Unchanged,
    /// The request or the reply failed; the snapshot was kept.
    Failed,
}

/// A shared, periodically refreshed telemetry snapshot.
///
/// The snapshot lives in a `watch` channel: the polling task is the only
/// writer and replaces the whole value at once, so readers never observe a
/// half-applied update.
///
/// Dropping the last handle stops the polling task.
#[derive(Debug)]
pub struct TelemetryCache {
    endpoint: String,
    interval: Duration,
    snapshot: watch::Receiver<DeviceSnapshot>,
    task: JoinHandle<()>,
}

impl TelemetryCache {
    /// Default polling interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Starts polling `transport` every `interval`.
    ///
    /// The first poll runs immediately. A zero interval falls back to
    /// [`DEFAULT_INTERVAL`](Self::DEFAULT_INTERVAL).
    ///
    /// Prefer [`TelemetryRegistry::get_or_start`](super::TelemetryRegistry::get_or_start),
    /// which shares one cache per endpoint.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn start<P>(endpoint: impl Into<String>, transport: Arc<P>, interval: Duration) -> Arc<Self>
    where
        P: Transport + 'static,
    {
        let endpoint = endpoint.into();
        let interval = if interval.is_zero() {
            Self::DEFAULT_INTERVAL
        } else {
            interval
        };
        let (sender, snapshot) = watch::channel(DeviceSnapshot::default());

        tracing::info!(endpoint = %endpoint, interval_secs = interval.as_secs_f64(), "Starting telemetry polling");

        let task_endpoint = endpoint.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let outcome = poll_once(transport.as_ref(), &sender).await;
                tracing::trace!(endpoint = %task_endpoint, ?outcome, "Telemetry poll finished");
            }
        });

        Arc::new(Self {
            endpoint,
            interval,
            snapshot,
            task,
        })
    }

    /// Returns the endpoint this cache polls.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the most recent snapshot. Never waits for the network.
    #[must_use]
    pub fn read(&self) -> DeviceSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Returns a receiver notified whenever the snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.snapshot.clone()
    }

    /// Returns `true` while the polling task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TelemetryCache {
    fn drop(&mut self) {
        tracing::debug!(endpoint = %self.endpoint, "Stopping telemetry polling");
        self.task.abort();
    }
}

/// Runs one fetch-and-populate cycle.
///
/// Failures are logged and leave the snapshot untouched.
pub(crate) async fn poll_once<P: Transport>(
    transport: &P,
    sender: &watch::Sender<DeviceSnapshot>,
) -> PollOutcome {
    let reply = match transport.send_command(&Query::MatrixInfo).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "Telemetry poll failed");
            return PollOutcome::Failed;
        }
    };

    let info = match parse_object::<MatrixInfoResponse>(&reply) {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed telemetry reply");
            return PollOutcome::Failed;
        }
    };

    if info.is_empty() {
        tracing::debug!("Empty telemetry reply, keeping previous snapshot");
        return PollOutcome::Unchanged;
    }

    sender.send_if_modified(|current| {
        let next = current.merged(&info);
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });

    PollOutcome::Updated
}
