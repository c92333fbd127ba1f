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

//! Port markers and the route line, drawn on top of the basemap.

use egui::{Color32, FontId, Pos2, Stroke};
use walkers::{lon_lat, MapMemory, Plugin, Projector};

use seaway_core::geo::Coordinates;
use seaway_core::route::RoutePath;
use seaway_core::selection::Selection;
use seaway_core::Port;

/// Pointer distance in pixels that still counts as clicking a marker
pub const HIT_RADIUS_PX: f32 = 10.0;

const MARKER_RADIUS: f32 = 5.0;
const PORT_COLOR: Color32 = Color32::from_rgb(40, 110, 190);
const ORIGIN_COLOR: Color32 = Color32::from_rgb(30, 160, 90);
const DESTINATION_COLOR: Color32 = Color32::from_rgb(210, 60, 60);
const DISABLED_COLOR: Color32 = Color32::from_rgb(150, 150, 150);
const ROUTE_COLOR: Color32 = Color32::from_rgb(20, 80, 160);

/// Nearest enabled port within `radius` pixels of `pointer`.
///
/// `project` maps coordinates to screen space. Ports without coordinates
/// are never hit.
pub fn hit_test<'p>(
    ports: &'p [Port],
    pointer: Pos2,
    radius: f32,
    project: impl Fn(Coordinates) -> Pos2,
) -> Option<&'p Port> {
    ports
        .iter()
        .filter(|port| !port.is_disabled())
        .filter_map(|port| {
            let coords = port.coordinates?;
            let distance = project(coords).distance(pointer);
            (distance <= radius).then_some((port, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(port, _)| port)
}

fn to_screen(projector: &Projector, coords: Coordinates) -> Pos2 {
    projector
        .project(lon_lat(coords.longitude, coords.latitude))
        .to_pos2()
}

/// Walkers plugin drawing the port catalog and the current route.
///
/// A click on a marker is written to `clicked`.
pub struct PortsLayer<'a> {
    ports: &'a [Port],
    selection: &'a Selection,
    route: Option<&'a RoutePath>,
    clicked: &'a mut Option<Port>,
}

impl<'a> PortsLayer<'a> {
    pub fn new(
        ports: &'a [Port],
        selection: &'a Selection,
        route: Option<&'a RoutePath>,
        clicked: &'a mut Option<Port>,
    ) -> Self {
        Self {
            ports,
            selection,
            route,
            clicked,
        }
    }

    fn marker_color(&self, port: &Port) -> Color32 {
        if self.selection.origin().is_some_and(|o| o.is_same_port(port)) {
            ORIGIN_COLOR
        } else if self.selection.destination().is_some_and(|d| d.is_same_port(port)) {
            DESTINATION_COLOR
        } else if port.is_disabled() {
            DISABLED_COLOR
        } else {
            PORT_COLOR
        }
    }
}

impl Plugin for PortsLayer<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &MapMemory,
    ) {
        let painter = ui.painter_at(response.rect);

        if let Some(route) = self.route {
            painter.line_segment(
                [to_screen(projector, route.from), to_screen(projector, route.to)],
                Stroke::new(3.0, ROUTE_COLOR),
            );
        }

        for port in self.ports {
            let Some(coords) = port.coordinates else {
                continue;
            };
            let pos = to_screen(projector, coords);
            let color = self.marker_color(port);

            painter.circle(pos, MARKER_RADIUS, color, Stroke::new(1.5, Color32::WHITE));
            painter.text(
                pos + egui::vec2(MARKER_RADIUS + 3.0, 0.0),
                egui::Align2::LEFT_CENTER,
                &port.name,
                FontId::proportional(12.0),
                Color32::from_rgb(30, 40, 50),
            );
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                if let Some(port) =
                    hit_test(self.ports, pointer, HIT_RADIUS_PX, |c| to_screen(projector, c))
                {
                    *self.clicked = Some(port.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seaway_core::port::fallback_ports;

    // Flat projection, 10 px per degree
    fn flat(coords: Coordinates) -> Pos2 {
        Pos2::new((coords.longitude * 10.0) as f32, (-coords.latitude * 10.0) as f32)
    }

    #[test]
    fn test_hit_picks_nearest_marker() {
        let ports = vec![
            Port::new("1", "A", 0.0, 0.0, "X"),
            Port::new("2", "B", 0.0, 1.0, "X"),
        ];
        let hit = hit_test(&ports, Pos2::new(7.0, 0.0), HIT_RADIUS_PX, flat);
        assert_eq!(hit.map(|p| p.name.as_str()), Some("B"));
    }

    #[test]
    fn test_miss_outside_radius() {
        let ports = fallback_ports();
        assert!(hit_test(&ports, Pos2::new(5000.0, 5000.0), HIT_RADIUS_PX, flat).is_none());
    }

    #[test]
    fn test_disabled_and_unlocated_ports_not_clickable() {
        let mut disabled = Port::new("1", "Closed", 0.0, 0.0, "X");
        disabled.disabled = Some(true);
        let mut unlocated = Port::new("2", "Nowhere", 0.0, 0.0, "X");
        unlocated.coordinates = None;

        let ports = vec![disabled, unlocated];
        assert!(hit_test(&ports, Pos2::ZERO, HIT_RADIUS_PX, flat).is_none());
    }
}
