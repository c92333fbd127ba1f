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

//! reqwest-backed prediction transport and port catalog.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::endpoints::Endpoints;
use crate::events::{AppEvent, EventBus};
use crate::port::{fallback_ports, Port};
use crate::prediction::transport::{PredictionTransport, TransportError};
use crate::prediction::types::{
    DelayPredictionRequest, DelayPredictionResponse, HazardAssessmentRequest,
    HazardAssessmentResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the route planning backend.
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoints: Endpoints,
    token: Option<String>,
}

impl std::fmt::Debug for HttpPredictionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPredictionClient")
            .field("endpoints", &self.endpoints)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl HttpPredictionClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoints,
            token: None,
        })
    }

    /// Attach `Authorization: Bearer <token>` to every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {url}");
        let response = self.authorize(self.client.post(url)).json(body).send().await?;
        decode(response).await
    }

    /// Fetch the full port catalog.
    pub async fn fetch_ports(&self) -> Result<Vec<Port>, TransportError> {
        let url = self.endpoints.ports_url();
        debug!("GET {url}");
        let response = self.authorize(self.client.get(&url)).send().await?;
        decode(response).await
    }

    /// Fetch the port catalog, substituting the built-in ports on any failure.
    ///
    /// A 401 is also published as [`AppEvent::SessionExpired`].
    pub async fn ports_or_fallback(&self, events: Option<&EventBus>) -> Vec<Port> {
        match self.fetch_ports().await {
            Ok(ports) => {
                info!("Loaded {} ports from backend", ports.len());
                ports
            }
            Err(e) => {
                warn!("Failed to load port catalog, using fallback ports: {e}");
                if e.is_unauthorized() {
                    if let Some(events) = events {
                        events.publish(AppEvent::SessionExpired);
                    }
                }
                fallback_ports()
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(TransportError::Unauthorized);
    }
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
}

#[async_trait]
impl PredictionTransport for HttpPredictionClient {
    async fn predict_delay(
        &self,
        request: DelayPredictionRequest,
    ) -> Result<DelayPredictionResponse, TransportError> {
        self.post_json(&self.endpoints.delay_url(), &request).await
    }

    async fn assess_hazards(
        &self,
        request: HazardAssessmentRequest,
    ) -> Result<HazardAssessmentResponse, TransportError> {
        self.post_json(&self.endpoints.hazard_url(), &request).await
    }
}
