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

//! Origin/destination selection state machine.
//!
//! Turns a stream of port clicks (and "route calculated elsewhere" messages)
//! into origin/destination pairs. The machine never fails: inputs that do not
//! apply simply leave the state untouched and report [`Transition::Ignored`].

use log::debug;

use crate::port::{find_by_name, Port, PortPair};

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Empty,
    /// Origin chosen, waiting for a destination.
    OriginSet(Port),
    /// Both endpoints chosen.
    PairComplete(PortPair),
}

impl Selection {
    #[must_use]
    pub fn origin(&self) -> Option<&Port> {
        match self {
            Self::Empty => None,
            Self::OriginSet(origin) => Some(origin),
            Self::PairComplete(pair) => Some(&pair.origin),
        }
    }

    #[must_use]
    pub fn destination(&self) -> Option<&Port> {
        match self {
            Self::PairComplete(pair) => Some(&pair.destination),
            _ => None,
        }
    }

    #[must_use]
    pub fn pair(&self) -> Option<&PortPair> {
        match self {
            Self::PairComplete(pair) => Some(pair),
            _ => None,
        }
    }
}

/// Result of feeding one input to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Input did not change the state.
    Ignored,
    /// A new pair was started with this origin.
    OriginSelected(Port),
    /// A pair was completed; predictions should be fetched.
    PairSelected(PortPair),
    /// Selection was reset to empty.
    Cleared,
}

/// Click-driven selection state machine.
#[derive(Debug, Default)]
pub struct SelectionMachine {
    state: Selection,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &Selection {
        &self.state
    }

    /// Handle a click on `port`.
    pub fn click(&mut self, port: &Port) -> Transition {
        match &self.state {
            Selection::Empty | Selection::PairComplete(_) => {
                self.state = Selection::OriginSet(port.clone());
                Transition::OriginSelected(port.clone())
            }
            Selection::OriginSet(origin) => {
                if origin.is_same_port(port) {
                    debug!("Ignoring repeated click on origin {}", port.name);
                    return Transition::Ignored;
                }
                let pair = PortPair {
                    origin: origin.clone(),
                    destination: port.clone(),
                };
                debug!("Pair selected: {} -> {}", pair.origin.name, pair.destination.name);
                self.state = Selection::PairComplete(pair.clone());
                Transition::PairSelected(pair)
            }
        }
    }

    /// Reset to [`Selection::Empty`].
    pub fn clear(&mut self) -> Transition {
        if self.state == Selection::Empty {
            return Transition::Ignored;
        }
        self.state = Selection::Empty;
        Transition::Cleared
    }

    /// Jump straight to a completed pair announced by another component.
    ///
    /// Both names must resolve in `catalog` and refer to different ports,
    /// otherwise the message is ignored.
    pub fn apply_route_calculated(
        &mut self,
        origin_name: &str,
        destination_name: &str,
        catalog: &[Port],
    ) -> Transition {
        let (Some(origin), Some(destination)) = (
            find_by_name(catalog, origin_name),
            find_by_name(catalog, destination_name),
        ) else {
            debug!("Route {origin_name} -> {destination_name} does not match the port catalog");
            return Transition::Ignored;
        };

        if origin.is_same_port(destination) {
            return Transition::Ignored;
        }

        let pair = PortPair {
            origin: origin.clone(),
            destination: destination.clone(),
        };
        self.state = Selection::PairComplete(pair.clone());
        Transition::PairSelected(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::fallback_ports;

    fn ports() -> Vec<Port> {
        fallback_ports()
    }

    #[test]
    fn test_first_click_sets_origin_without_pair() {
        let ports = ports();
        let mut machine = SelectionMachine::new();

        let transition = machine.click(&ports[0]);

        assert_eq!(transition, Transition::OriginSelected(ports[0].clone()));
        assert_eq!(machine.state().origin(), Some(&ports[0]));
        assert!(machine.state().pair().is_none());
    }

    #[test]
    fn test_second_distinct_click_completes_pair() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[0]);

        let transition = machine.click(&ports[1]);

        let Transition::PairSelected(pair) = transition else {
            panic!("expected a completed pair, got {transition:?}");
        };
        assert_eq!(pair.origin, ports[0]);
        assert_eq!(pair.destination, ports[1]);
    }

    #[test]
    fn test_repeated_origin_click_is_ignored() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[0]);
        let before = machine.state().clone();

        assert_eq!(machine.click(&ports[0]), Transition::Ignored);
        assert_eq!(machine.state(), &before);
    }

    #[test]
    fn test_duplicate_name_counts_as_same_port() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[0]);

        let twin = Port::new("1-dup", "Singapore", 1.3, 103.8, "Asia");
        assert_eq!(machine.click(&twin), Transition::Ignored);
    }

    #[test]
    fn test_third_click_restarts_pair() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[0]);
        machine.click(&ports[1]);

        let transition = machine.click(&ports[2]);

        assert_eq!(transition, Transition::OriginSelected(ports[2].clone()));
        assert_eq!(machine.state(), &Selection::OriginSet(ports[2].clone()));
        assert!(machine.state().destination().is_none());
    }

    #[test]
    fn test_pair_selected_emitted_once_per_completion() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        let clicks = [0, 0, 1, 1, 2, 3, 3, 4];

        let completions = clicks
            .iter()
            .map(|&i| machine.click(&ports[i]))
            .filter(|t| matches!(t, Transition::PairSelected(_)))
            .count();

        // 0 -> 1, then 1 restarts and 1 -> 2, then 3 restarts and 3 -> 4
        assert_eq!(completions, 3);
    }

    #[test]
    fn test_origin_never_equals_destination() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        // Deterministic pseudo-random click sequence over a small pool
        let mut seed: u32 = 7;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let idx = (seed >> 16) as usize % 3;
            machine.click(&ports[idx]);

            if let Some(pair) = machine.state().pair() {
                assert!(!pair.origin.is_same_port(&pair.destination));
            }
        }
    }

    #[test]
    fn test_clear_from_any_state() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        assert_eq!(machine.clear(), Transition::Ignored);

        machine.click(&ports[0]);
        assert_eq!(machine.clear(), Transition::Cleared);
        assert_eq!(machine.state(), &Selection::Empty);

        machine.click(&ports[0]);
        machine.click(&ports[1]);
        assert_eq!(machine.clear(), Transition::Cleared);
        assert_eq!(machine.state(), &Selection::Empty);
    }

    #[test]
    fn test_route_calculated_jumps_to_pair() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[5]);

        let transition = machine.apply_route_calculated("Dubai", "Mumbai", &ports);

        let Transition::PairSelected(pair) = transition else {
            panic!("expected a completed pair, got {transition:?}");
        };
        assert_eq!(pair.origin.name, "Dubai");
        assert_eq!(pair.destination.name, "Mumbai");
        assert_eq!(machine.state().pair(), Some(&pair));
    }

    #[test]
    fn test_route_calculated_with_unknown_name_is_ignored() {
        let ports = ports();
        let mut machine = SelectionMachine::new();
        machine.click(&ports[0]);
        let before = machine.state().clone();

        assert_eq!(
            machine.apply_route_calculated("Dubai", "Atlantis", &ports),
            Transition::Ignored
        );
        assert_eq!(
            machine.apply_route_calculated("Dubai", "Dubai", &ports),
            Transition::Ignored
        );
        assert_eq!(machine.state(), &before);
    }
}
