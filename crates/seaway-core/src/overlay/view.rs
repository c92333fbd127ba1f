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

//! Display model for the prediction overlay.
//!
//! Everything here is derived from the current selection, the two request
//! slots and the overlay UI state. Nothing is stored; the shell composes a
//! fresh [`OverlayView`] each frame.

use std::fmt::Display;

use chrono::TimeZone;

use super::format::{
    format_eta, format_grouped, format_hours, format_percent, format_position, format_window,
};
use super::state::{OverlayState, OverlayTab};
use crate::prediction::{
    DelayPredictionResponse, Hazard, HazardAssessmentResponse, HazardSegment, RequestSlot,
    Severity,
};
use crate::selection::Selection;

/// Shown instead of an empty segment list.
pub const NO_HAZARDS_MESSAGE: &str = "No relevant hazards detected on this route.";

/// Prefix of the per-segment ice advisory.
pub const ICE_ADVISORY: &str = "Route not viable due to seasonal ice.";

/// Qualitative delay risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a delay probability; a missing probability counts as zero.
    #[must_use]
    pub fn from_probability(probability: Option<f64>) -> Self {
        let p = probability.unwrap_or(0.0);
        if p >= 0.5 {
            Self::High
        } else if p >= 0.2 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Style class: `good`, `warn` or `bad`.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Low => "good",
            Self::Medium => "warn",
            Self::High => "bad",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low risk",
            Self::Medium => "Medium risk",
            Self::High => "High risk",
        }
    }
}

/// Status pill in the overlay header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pill {
    Calculating,
    Risk(RiskLevel),
    Empty,
}

impl Pill {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Calculating => "Calculating…",
            Self::Risk(level) => level.label(),
            Self::Empty => "",
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Risk(level) => level.class(),
            Self::Calculating | Self::Empty => "good",
        }
    }
}

/// Badge class for a hazard severity. Unrecognised severities render as low.
#[must_use]
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low | Severity::Unknown => "low",
    }
}

/// Formatted delay prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayDetails {
    pub risk: RiskLevel,
    pub delay_hours: String,
    pub probability: String,
    pub main_factor: Option<String>,
    pub planned_eta: Option<String>,
    pub adjusted_eta: Option<String>,
    pub used_fallback: bool,
}

impl DelayDetails {
    fn new<Tz>(response: &DelayPredictionResponse, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            risk: RiskLevel::from_probability(response.delay_probability),
            delay_hours: format_hours(response.delay_hours),
            probability: format_percent(response.delay_probability.unwrap_or(0.0)),
            main_factor: response.main_delay_factor.clone(),
            planned_eta: response
                .planned_eta_iso
                .as_deref()
                .and_then(|iso| format_eta(iso, tz)),
            adjusted_eta: response
                .adjusted_eta_iso
                .as_deref()
                .and_then(|iso| format_eta(iso, tz)),
            used_fallback: response.used_fallback,
        }
    }
}

/// One hazard line within a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardRow {
    pub kind: String,
    pub badge_class: &'static str,
    pub probability: String,
    pub region: Option<String>,
    pub window: Option<String>,
    pub rationale: Option<String>,
}

impl HazardRow {
    fn new<Tz>(hazard: &Hazard, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            kind: hazard.kind.clone(),
            badge_class: severity_class(hazard.severity),
            probability: format_percent(hazard.probability),
            region: hazard.region_name.clone(),
            window: format_window(
                hazard.window_start_iso.as_deref(),
                hazard.window_end_iso.as_deref(),
                tz,
            ),
            rationale: hazard.rationale.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentView {
    /// 1-based position along the route.
    pub number: usize,
    pub span: String,
    pub ice_advisory: Option<String>,
    pub hazards: Vec<HazardRow>,
}

impl SegmentView {
    fn new<Tz>(number: usize, segment: &HazardSegment, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let ice_advisory = segment.not_viable_due_to_ice.then(|| {
            match segment.advisory.as_deref().map(str::trim) {
                Some(advisory) if !advisory.is_empty() => format!("{ICE_ADVISORY} {advisory}"),
                _ => ICE_ADVISORY.to_string(),
            }
        });

        Self {
            number,
            span: format!(
                "{} → {}",
                format_position(segment.start_lat, segment.start_lon),
                format_position(segment.end_lat, segment.end_lon)
            ),
            ice_advisory,
            hazards: segment.hazards.iter().map(|h| HazardRow::new(h, tz)).collect(),
        }
    }
}

/// Formatted hazard assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardDetails {
    pub season: String,
    pub hemisphere: String,
    pub distance: String,
    pub planned_hours: String,
    pub segments: Vec<SegmentView>,
    /// Set when the route has no segments to list.
    pub empty_message: Option<&'static str>,
}

impl HazardDetails {
    fn new<Tz>(response: &HazardAssessmentResponse, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let segments: Vec<SegmentView> = response
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| SegmentView::new(i + 1, segment, tz))
            .collect();

        Self {
            season: format!("{} (month {})", response.season, response.month),
            hemisphere: response.hemisphere.clone(),
            distance: format!("{} km", format_grouped(response.route_distance_km)),
            planned_hours: format_grouped(response.planned_hours),
            empty_message: segments.is_empty().then_some(NO_HAZARDS_MESSAGE),
            segments,
        }
    }
}

/// Body of the active tab. Exactly one tab is shown at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum TabBody {
    Delay {
        loading: bool,
        details: Option<DelayDetails>,
        error: Option<&'static str>,
    },
    Hazards {
        loading: bool,
        /// Withheld while a newer assessment is loading.
        details: Option<HazardDetails>,
        error: Option<&'static str>,
    },
}

/// Everything the overlay widget needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub origin: String,
    pub destination: String,
    pub pill: Pill,
    pub tab: OverlayTab,
    pub expanded: bool,
    pub body: TabBody,
}

impl OverlayView {
    /// Compose the overlay, or `None` when no pair is selected.
    ///
    /// Dates are rendered in `tz`.
    #[must_use]
    pub fn compose<Tz>(
        selection: &Selection,
        delay: &RequestSlot<DelayPredictionResponse>,
        hazard: &RequestSlot<HazardAssessmentResponse>,
        state: &OverlayState,
        tz: &Tz,
    ) -> Option<Self>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let pair = selection.pair()?;

        let pill = if delay.is_loading() {
            Pill::Calculating
        } else {
            delay
                .value()
                .map_or(Pill::Empty, |d| Pill::Risk(RiskLevel::from_probability(d.delay_probability)))
        };

        let body = match state.tab() {
            OverlayTab::Delay => TabBody::Delay {
                loading: delay.is_loading(),
                details: delay.value().map(|d| DelayDetails::new(d, tz)),
                error: delay.error(),
            },
            OverlayTab::Hazards => TabBody::Hazards {
                loading: hazard.is_loading(),
                details: if hazard.is_loading() {
                    None
                } else {
                    hazard.value().map(|h| HazardDetails::new(h, tz))
                },
                error: hazard.error(),
            },
        };

        Some(Self {
            origin: pair.origin.name.clone(),
            destination: pair.destination.name.clone(),
            pill,
            tab: state.tab(),
            expanded: state.is_expanded(),
            body,
        })
    }
}
