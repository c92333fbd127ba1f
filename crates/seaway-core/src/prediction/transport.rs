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

//! Transport seam between the orchestrator and the prediction backend.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    DelayPredictionRequest, DelayPredictionResponse, HazardAssessmentRequest,
    HazardAssessmentResponse,
};

/// Errors that can occur while talking to the prediction backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("authentication rejected (401)")]
    Unauthorized,

    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether the auth collaborator has to tear down the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Backend able to answer delay and hazard questions.
///
/// Implementations must not block; the orchestrator spawns each call on a
/// tokio runtime.
#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn predict_delay(
        &self,
        request: DelayPredictionRequest,
    ) -> Result<DelayPredictionResponse, TransportError>;

    async fn assess_hazards(
        &self,
        request: HazardAssessmentRequest,
    ) -> Result<HazardAssessmentResponse, TransportError>;
}
