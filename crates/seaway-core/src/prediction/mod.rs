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

//! Delay prediction and hazard assessment.
//!
//! [`types`] holds the wire format, [`transport`] the backend seam,
//! [`slot`] the per-request-type epoch bookkeeping and [`orchestrator`]
//! ties them together on the UI thread.

pub mod orchestrator;
pub mod slot;
pub mod transport;
pub mod types;

pub use orchestrator::{
    PredictionOrchestrator, RequestKind, DELAY_FAILURE_MESSAGE, HAZARD_FAILURE_MESSAGE,
};
pub use slot::{FetchStatus, RequestEpoch, RequestSlot, Resolution};
pub use transport::{PredictionTransport, TransportError};
pub use types::{
    CircularRegion, DelayPredictionRequest, DelayPredictionResponse, Hazard,
    HazardAssessmentRequest, HazardAssessmentResponse, HazardSegment, PredictionParams, Severity,
};
