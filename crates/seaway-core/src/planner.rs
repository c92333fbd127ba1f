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

//! Selection-driven control flow: a completed pair fetches both predictions
//! and draws the route, anything else discards in-flight work.

use log::{debug, info};

use crate::events::{AppEvent, EventBus};
use crate::port::Port;
use crate::prediction::{PredictionOrchestrator, PredictionParams, RequestEpoch, RequestKind};
use crate::route::{MapSurface, RenderOutcome, RouteRenderer};
use crate::selection::{Selection, SelectionMachine, Transition};

/// Owns the selection and wires its transitions to predictions, events and
/// the route line.
#[derive(Debug)]
pub struct RoutePlanner<H> {
    selection: SelectionMachine,
    orchestrator: PredictionOrchestrator,
    events: EventBus,
    params: PredictionParams,
    renderer: RouteRenderer<H>,
}

impl<H> RoutePlanner<H> {
    pub fn new(orchestrator: PredictionOrchestrator, events: EventBus, params: PredictionParams) -> Self {
        Self {
            selection: SelectionMachine::new(),
            orchestrator,
            events,
            params,
            renderer: RouteRenderer::new(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.selection.state()
    }

    #[must_use]
    pub fn orchestrator(&self) -> &PredictionOrchestrator {
        &self.orchestrator
    }

    pub fn orchestrator_mut(&mut self) -> &mut PredictionOrchestrator {
        &mut self.orchestrator
    }

    /// A port was clicked on the map or in the list.
    pub fn click<S>(&mut self, port: &Port, surface: &mut S) -> Option<RenderOutcome>
    where
        S: MapSurface<Handle = H>,
    {
        let transition = self.selection.click(port);
        self.apply(transition, surface)
    }

    pub fn clear<S>(&mut self, surface: &mut S) -> Option<RenderOutcome>
    where
        S: MapSurface<Handle = H>,
    {
        let transition = self.selection.clear();
        self.apply(transition, surface)
    }

    /// Another component calculated a route between two catalog ports.
    pub fn route_calculated<S>(
        &mut self,
        origin_name: &str,
        destination_name: &str,
        catalog: &[Port],
        surface: &mut S,
    ) -> Option<RenderOutcome>
    where
        S: MapSurface<Handle = H>,
    {
        let transition = self
            .selection
            .apply_route_calculated(origin_name, destination_name, catalog);
        self.apply(transition, surface)
    }

    /// Manual refresh of one prediction for the current pair.
    pub fn refresh(&mut self, kind: RequestKind) -> Option<RequestEpoch> {
        let pair = self.selection.state().pair();
        match kind {
            RequestKind::Delay => self.orchestrator.request_delay(pair, &self.params),
            RequestKind::Hazard => self.orchestrator.request_hazard(pair, &self.params),
        }
    }

    /// Act on a selection transition. `None` when the input changed nothing.
    pub fn apply<S>(&mut self, transition: Transition, surface: &mut S) -> Option<RenderOutcome>
    where
        S: MapSurface<Handle = H>,
    {
        match transition {
            Transition::Ignored => return None,
            Transition::OriginSelected(port) => {
                info!("Origin set to {}", port.name);
                self.orchestrator.reset();
            }
            Transition::PairSelected(pair) => {
                info!("Route selected: {} -> {}", pair.origin.name, pair.destination.name);
                self.orchestrator.reset();
                self.orchestrator.request_all(&pair, &self.params);
                self.events.publish(AppEvent::PairSelected(pair));
            }
            Transition::Cleared => {
                info!("Selection cleared");
                self.orchestrator.reset();
                self.events.publish(AppEvent::SelectionCleared);
            }
        }

        let outcome = self.renderer.render(surface, self.selection.state().pair());
        debug!("Route render: {outcome:?}");
        Some(outcome)
    }
}
