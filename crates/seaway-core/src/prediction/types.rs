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

//! Wire types for the delay prediction and hazard assessment services.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::nautical_miles_to_km;
use crate::port::PortPair;

/// Inputs that shape a prediction besides the port pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionParams {
    /// Planned cruise speed in knots.
    pub cruise_speed_knots: f64,
    /// Route length in nautical miles, when known from an external route planner.
    pub distance_nm: Option<f64>,
    /// Average wind assumed by the delay model.
    pub avg_wind_knots: f64,
    /// Maximum wave height assumed by the delay model.
    pub max_wave_m: f64,
}

impl Default for PredictionParams {
    fn default() -> Self {
        Self {
            cruise_speed_knots: 18.0,
            distance_nm: None,
            avg_wind_knots: 12.0,
            max_wave_m: 2.0,
        }
    }
}

impl PredictionParams {
    /// Route distance in km: an explicit nautical-mile distance wins over the
    /// great-circle distance between the ports.
    #[must_use]
    pub fn distance_km(&self, pair: &PortPair) -> Option<f64> {
        self.distance_nm
            .map(nautical_miles_to_km)
            .or_else(|| pair.great_circle_km())
    }
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body of `POST {apiBase}{predictDelayPath}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayPredictionRequest {
    pub origin: String,
    pub destination: String,
    pub cruise_speed_knots: f64,
    pub avg_wind_knots: f64,
    pub max_wave_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_lon: Option<f64>,
    pub departure_time_iso: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl DelayPredictionRequest {
    #[must_use]
    pub fn new(pair: &PortPair, params: &PredictionParams, departure: DateTime<Utc>) -> Self {
        let origin = pair.origin.coordinates;
        let destination = pair.destination.coordinates;
        Self {
            origin: pair.origin.name.clone(),
            destination: pair.destination.name.clone(),
            cruise_speed_knots: params.cruise_speed_knots,
            avg_wind_knots: params.avg_wind_knots,
            max_wave_m: params.max_wave_m,
            origin_lat: origin.map(|c| c.latitude),
            origin_lon: origin.map(|c| c.longitude),
            dest_lat: destination.map(|c| c.latitude),
            dest_lon: destination.map(|c| c.longitude),
            departure_time_iso: iso_timestamp(departure),
            distance_km: params.distance_km(pair),
        }
    }
}

/// Body of `POST {apiBase}{hazardAssessmentPath}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardAssessmentRequest {
    pub origin_lat: f64,
    pub origin_lon: f64,
    pub dest_lat: f64,
    pub dest_lon: f64,
    pub departure_time_iso: String,
    pub cruise_speed_knots: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl HazardAssessmentRequest {
    /// Build the request; `None` if either port has no coordinates.
    #[must_use]
    pub fn new(pair: &PortPair, params: &PredictionParams, departure: DateTime<Utc>) -> Option<Self> {
        let (origin, destination) = pair.coordinates()?;
        Some(Self {
            origin_lat: origin.latitude,
            origin_lon: origin.longitude,
            dest_lat: destination.latitude,
            dest_lon: destination.longitude,
            departure_time_iso: iso_timestamp(departure),
            cruise_speed_knots: params.cruise_speed_knots,
            distance_km: params.distance_km(pair),
        })
    }
}

/// Delay model output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayPredictionResponse {
    /// Expected delay in hours.
    #[serde(default)]
    pub delay_hours: f64,
    /// Probability of a significant delay, 0..1. Older backends call it `riskScore`.
    #[serde(default, alias = "riskScore")]
    pub delay_probability: Option<f64>,
    #[serde(default)]
    pub planned_eta_iso: Option<String>,
    #[serde(default)]
    pub adjusted_eta_iso: Option<String>,
    #[serde(default)]
    pub main_delay_factor: Option<String>,
    /// The model fell back to defaults; confidence is degraded.
    #[serde(default)]
    pub used_fallback: bool,
    #[serde(default)]
    pub used_avg_wind_knots: Option<f64>,
    #[serde(default)]
    pub used_max_wave_m: Option<f64>,
}

/// Hazard severity as reported by the assessment service.
///
/// Matching is case-insensitive; `null` and unrecognised values decode as
/// [`Severity::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    /// Anything the client does not recognise.
    #[default]
    Unknown,
}

impl Severity {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map_or(Self::Unknown, Self::from_label))
    }
}

/// Circular area a hazard applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularRegion {
    pub lat_center: f64,
    pub lon_center: f64,
    pub radius_km: f64,
}

/// A single hazard affecting a route segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    /// Hazard kind, e.g. `HURRICANE` or `ICE`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub window_start_iso: Option<String>,
    #[serde(default)]
    pub window_end_iso: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub lat_center: Option<f64>,
    #[serde(default)]
    pub lon_center: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
}

impl Hazard {
    #[must_use]
    pub fn region(&self) -> Option<CircularRegion> {
        Some(CircularRegion {
            lat_center: self.lat_center?,
            lon_center: self.lon_center?,
            radius_km: self.radius_km?,
        })
    }
}

/// A leg of the assessed route with the hazards found on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardSegment {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
    #[serde(default)]
    pub hazards: Vec<Hazard>,
    #[serde(default)]
    pub not_viable_due_to_ice: bool,
    #[serde(default)]
    pub advisory: Option<String>,
}

/// Seasonal hazard assessment for a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardAssessmentResponse {
    /// Meteorological season code (`DJF`, `MAM`, `JJA`, `SON`).
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub month: u8,
    /// `N` or `S`.
    #[serde(default)]
    pub hemisphere: String,
    #[serde(default)]
    pub route_distance_km: f64,
    #[serde(default)]
    pub planned_hours: f64,
    #[serde(default)]
    pub segments: Vec<HazardSegment>,
}
