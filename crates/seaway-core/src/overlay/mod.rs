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

//! Prediction overlay: tab state, formatting and the composed view.

pub mod format;
pub mod state;
pub mod view;

pub use state::{OverlayAction, OverlayState, OverlayTab};
pub use view::{
    severity_class, DelayDetails, HazardDetails, HazardRow, OverlayView, Pill, RiskLevel,
    SegmentView, TabBody, ICE_ADVISORY, NO_HAZARDS_MESSAGE,
};
