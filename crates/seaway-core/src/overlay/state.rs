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

//! Overlay UI state and the actions the shell feeds back into it.

use log::debug;

use crate::prediction::RequestKind;

/// Which body the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayTab {
    #[default]
    Delay,
    Hazards,
}

/// User interaction with the overlay, returned by the widget each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    SelectTab(OverlayTab),
    ToggleVisibility,
    RefreshDelay,
    RefreshHazards,
}

/// Tab and show/hide state of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayState {
    tab: OverlayTab,
    expanded: bool,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OverlayState {
    #[must_use]
    pub fn new(expanded: bool) -> Self {
        Self {
            tab: OverlayTab::default(),
            expanded,
        }
    }

    #[must_use]
    pub fn tab(&self) -> OverlayTab {
        self.tab
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Apply `action`, returning the request the shell should issue, if any.
    ///
    /// Only the refresh actions fetch; switching tabs never does.
    pub fn handle(&mut self, action: OverlayAction) -> Option<RequestKind> {
        debug!("Overlay action {action:?}");
        match action {
            OverlayAction::SelectTab(tab) => {
                self.tab = tab;
                None
            }
            OverlayAction::ToggleVisibility => {
                self.expanded = !self.expanded;
                None
            }
            OverlayAction::RefreshDelay => Some(RequestKind::Delay),
            OverlayAction::RefreshHazards => Some(RequestKind::Hazard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_switch_never_fetches() {
        let mut state = OverlayState::default();
        assert_eq!(state.handle(OverlayAction::SelectTab(OverlayTab::Hazards)), None);
        assert_eq!(state.tab(), OverlayTab::Hazards);
        assert_eq!(state.handle(OverlayAction::SelectTab(OverlayTab::Delay)), None);
        assert_eq!(state.tab(), OverlayTab::Delay);
    }

    #[test]
    fn test_refresh_maps_to_request_kind() {
        let mut state = OverlayState::default();
        assert_eq!(state.handle(OverlayAction::RefreshDelay), Some(RequestKind::Delay));
        assert_eq!(state.handle(OverlayAction::RefreshHazards), Some(RequestKind::Hazard));
        assert_eq!(state.tab(), OverlayTab::Delay);
    }

    #[test]
    fn test_toggle_visibility() {
        let mut state = OverlayState::new(false);
        assert!(!state.is_expanded());
        state.handle(OverlayAction::ToggleVisibility);
        assert!(state.is_expanded());
        state.handle(OverlayAction::ToggleVisibility);
        assert!(!state.is_expanded());
    }
}
