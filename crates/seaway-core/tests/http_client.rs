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

//! HTTP transport tests against a mock backend.

use chrono::{TimeZone, Utc};
use serde_json::json;
use seaway_core::events::{drain, AppEvent, EventBus};
use seaway_core::http::{Endpoints, HttpPredictionClient};
use seaway_core::port::{Port, PortPair};
use seaway_core::prediction::{
    DelayPredictionRequest, HazardAssessmentRequest, PredictionParams, PredictionTransport,
    Severity, TransportError,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn singapore_rotterdam() -> PortPair {
    PortPair {
        origin: Port::new("1", "Singapore", 1.29, 103.85, "Asia"),
        destination: Port::new("2", "Rotterdam", 51.91, 4.47, "Europe"),
    }
}

fn departure() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 1, 8, 0, 0).unwrap()
}

fn client(server: &MockServer, api_suffix: &str) -> HttpPredictionClient {
    HttpPredictionClient::new(Endpoints::new(format!("{}{api_suffix}", server.uri())))
        .unwrap()
        .with_token(Some("test-token".to_string()))
}

#[tokio::test]
async fn test_predict_delay_posts_to_joined_url_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/predict-weather-delay"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "origin": "Singapore",
            "destination": "Rotterdam",
            "cruiseSpeedKnots": 18.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "delayHours": 5.25,
            "delayProbability": 0.62,
            "plannedEtaIso": "2025-07-14T12:00:00Z",
            "adjustedEtaIso": "2025-07-14T17:15:00Z",
            "mainDelayFactor": "Monsoon swell"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Base already ends in /api, path starts with /api/
    let client = client(&server, "/api/");
    let request =
        DelayPredictionRequest::new(&singapore_rotterdam(), &PredictionParams::default(), departure());
    let response = client.predict_delay(request).await.unwrap();

    assert!((response.delay_hours - 5.25).abs() < f64::EPSILON);
    assert_eq!(response.delay_probability, Some(0.62));
    assert_eq!(response.main_delay_factor.as_deref(), Some("Monsoon swell"));
}

#[tokio::test]
async fn test_assess_hazards_decodes_segments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai/hazard-assessment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "season": "JJA",
            "month": 7,
            "hemisphere": "N",
            "routeDistanceKm": 10536.0,
            "plannedHours": 316.0,
            "segments": [{
                "startLat": 1.29,
                "startLon": 103.85,
                "endLat": 12.0,
                "endLon": 60.0,
                "notViableDueToIce": false,
                "hazards": [{
                    "type": "MONSOON",
                    "probability": 0.7,
                    "severity": "HIGH",
                    "windowStartIso": "2025-06-01T00:00:00Z",
                    "windowEndIso": "2025-09-30T00:00:00Z",
                    "regionName": "Arabian Sea",
                    "latCenter": 15.0,
                    "lonCenter": 65.0,
                    "radiusKm": 800.0
                }, {
                    "type": "FOG",
                    "probability": 0.1,
                    "severity": "EXTREME"
                }]
            }]
        })))
        .mount(&server)
        .await;

    let client = client(&server, "");
    let request = HazardAssessmentRequest::new(
        &singapore_rotterdam(),
        &PredictionParams::default(),
        departure(),
    )
    .unwrap();
    let response = client.assess_hazards(request).await.unwrap();

    assert_eq!(response.season, "JJA");
    let hazards = &response.segments[0].hazards;
    assert_eq!(hazards[0].severity, Severity::High);
    assert!(hazards[0].region().is_some());
    assert_eq!(hazards[1].severity, Severity::Unknown);
    assert!(hazards[1].region().is_none());
}

#[tokio::test]
async fn test_unauthorized_maps_to_dedicated_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server, "");
    let request =
        DelayPredictionRequest::new(&singapore_rotterdam(), &PredictionParams::default(), departure());
    let err = client.predict_delay(request).await.unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server, "");
    let request =
        DelayPredictionRequest::new(&singapore_rotterdam(), &PredictionParams::default(), departure());
    let err = client.predict_delay(request).await.unwrap_err();

    assert!(matches!(err, TransportError::Status { status: 503 }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client(&server, "");
    let request =
        DelayPredictionRequest::new(&singapore_rotterdam(), &PredictionParams::default(), departure());
    let err = client.predict_delay(request).await.unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn test_port_catalog_from_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ports/all-ports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "77",
                "name": "Valparaíso",
                "coordinates": { "latitude": -33.04, "longitude": -71.63 },
                "continent": "South America",
                "disabled": false
            }
        ])))
        .mount(&server)
        .await;

    let ports = client(&server, "").ports_or_fallback(None).await;

    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].name, "Valparaíso");
}

#[tokio::test]
async fn test_port_catalog_falls_back_and_reports_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ports/all-ports"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let ports = client(&server, "").ports_or_fallback(Some(&bus)).await;

    assert_eq!(ports.len(), 10);
    assert_eq!(ports[0].name, "Singapore");
    assert_eq!(drain(&mut rx), vec![AppEvent::SessionExpired]);
}

#[tokio::test]
async fn test_port_catalog_falls_back_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let ports = client(&server, "").ports_or_fallback(Some(&bus)).await;

    assert_eq!(ports.len(), 10);
    assert!(drain(&mut rx).is_empty());
}
