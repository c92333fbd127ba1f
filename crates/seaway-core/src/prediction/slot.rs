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

//! Per-request-type result slot with epoch fencing.
//!
//! Each slot remembers the epoch of the most recently issued request. A
//! response is only applied if it carries that epoch; anything older is a
//! superseded request and is dropped on arrival.

use super::transport::TransportError;

/// Monotonic request counter for one request type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestEpoch(u64);

impl RequestEpoch {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Result stored as the current value.
    Applied,
    /// Failure recorded; any previous value is kept.
    Failed,
    /// A newer request was issued since; the response was discarded.
    Stale,
}

/// Read-only view of a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchStatus<'a, T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight; `previous` is the last good value, if any.
    Pending { previous: Option<&'a T> },
    /// Latest request succeeded.
    Ready(&'a T),
    /// Latest request failed.
    Failed {
        message: &'static str,
        previous: Option<&'a T>,
    },
}

/// Latest result for one request type.
#[derive(Debug)]
pub struct RequestSlot<T> {
    epoch: RequestEpoch,
    loading: bool,
    value: Option<T>,
    error: Option<&'static str>,
    failure_message: &'static str,
}

impl<T> RequestSlot<T> {
    /// `failure_message` is the fixed text shown when a request fails.
    #[must_use]
    pub fn new(failure_message: &'static str) -> Self {
        Self {
            epoch: RequestEpoch::default(),
            loading: false,
            value: None,
            error: None,
            failure_message,
        }
    }

    #[must_use]
    pub fn epoch(&self) -> RequestEpoch {
        self.epoch
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    #[must_use]
    pub fn status(&self) -> FetchStatus<'_, T> {
        if self.loading {
            FetchStatus::Pending {
                previous: self.value.as_ref(),
            }
        } else if let Some(message) = self.error {
            FetchStatus::Failed {
                message,
                previous: self.value.as_ref(),
            }
        } else if let Some(value) = &self.value {
            FetchStatus::Ready(value)
        } else {
            FetchStatus::Idle
        }
    }

    /// Register a new request: bumps the epoch, sets loading and clears the error.
    pub fn begin(&mut self) -> RequestEpoch {
        self.epoch = self.epoch.next();
        self.loading = true;
        self.error = None;
        self.epoch
    }

    /// Apply the outcome of the request tagged with `epoch`.
    pub fn resolve(&mut self, epoch: RequestEpoch, result: Result<T, TransportError>) -> Resolution {
        if epoch != self.epoch {
            return Resolution::Stale;
        }

        self.loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
                Resolution::Applied
            }
            Err(_) => {
                self.error = Some(self.failure_message);
                Resolution::Failed
            }
        }
    }

    /// Forget everything and fence off requests still in flight.
    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.next();
        self.loading = false;
        self.value = None;
        self.error = None;
    }
}
