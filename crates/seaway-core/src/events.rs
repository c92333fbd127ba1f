// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application event channel.
//!
//! Components publish typed [`AppEvent`]s on an injected [`EventBus`] instead
//! of reaching for a process-wide namespace. Every subscriber gets its own
//! receiver; publishing with no subscribers is not an error.

use log::debug;
use tokio::sync::broadcast;

use crate::port::PortPair;

const DEFAULT_CAPACITY: usize = 64;

/// Events exchanged between the map, the overlay and their collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A route was computed by another component (e.g. a route planner panel).
    RouteCalculated {
        origin_name: String,
        destination_name: String,
    },
    /// The user completed an origin/destination pair.
    PairSelected(PortPair),
    /// The selection was reset.
    SelectionCleared,
    /// A backend call was rejected with 401; the session must be torn down.
    SessionExpired,
}

/// Cloneable publish/subscribe handle.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to every current subscriber.
    pub fn publish(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event published with no subscribers");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain every event currently queued on `rx` without blocking.
///
/// Lagged receivers skip the overwritten events and keep going.
pub fn drain(rx: &mut broadcast::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!("Event receiver lagged, skipped {skipped} events");
            }
            Err(broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed) => {
                return events;
            }
        }
    }
}
