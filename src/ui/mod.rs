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

//! UI components for Seaway Desktop.
//!
//! This module contains the floating prediction overlay and the side panel.

pub mod overlay_window;
pub mod route_panel;

pub use overlay_window::OverlayWindow;
pub use route_panel::{RoutePanel, RoutePanelAction};
