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

use log::{debug, warn};
use walkers::{lon_lat, HttpTiles, Map, MapMemory, Position};

use seaway_core::geo::{self, GeoBounds};
use seaway_core::route::{MapSurface, RoutePath};
use seaway_core::selection::Selection;
use seaway_core::Port;

use super::carto::{carto_tiles, CartoStyle};
use super::ports_layer::PortsLayer;

const MIN_FIT_ZOOM: f64 = 1.0;
const MAX_FIT_ZOOM: f64 = 12.0;

/// Identifies the route line currently on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteId(u64);

/// The basemap with port markers, route line and viewport control.
pub struct MapView {
    tiles: HttpTiles,
    memory: MapMemory,
    home: Position,
    home_zoom: f64,
    route: Option<(RouteId, RoutePath)>,
    next_route_id: u64,
    pending_fit: Option<(GeoBounds, f32)>,
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("route", &self.route)
            .field("pending_fit", &self.pending_fit)
            .finish_non_exhaustive()
    }
}

impl MapView {
    pub fn new(ctx: &egui::Context, style: CartoStyle, zoom: f64) -> Self {
        let mut memory = MapMemory::default();
        go_home(&mut memory, zoom);

        Self {
            tiles: carto_tiles(style, ctx),
            memory,
            home_zoom: zoom,
            // Indian Ocean, roughly between the busiest lanes
            home: lon_lat(60.0, 15.0),
            route: None,
            next_route_id: 0,
            pending_fit: None,
        }
    }

    /// Draw the map and return the port clicked this frame, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, ports: &[Port], selection: &Selection) -> Option<Port> {
        let size = ui.available_size();
        if let Some((bounds, padding)) = self.pending_fit.take() {
            self.apply_fit(&bounds, padding, size);
        }

        let mut clicked = None;
        let layer = PortsLayer::new(
            ports,
            selection,
            self.route.as_ref().map(|(_, path)| path),
            &mut clicked,
        );
        ui.add(Map::new(Some(&mut self.tiles), &mut self.memory, self.home).with_plugin(layer));

        clicked
    }

    /// Back to the starting view. A fit queued for the next frame is dropped.
    pub fn reset_view(&mut self) {
        self.pending_fit = None;
        go_home(&mut self.memory, self.home_zoom);
    }

    fn apply_fit(&mut self, bounds: &GeoBounds, padding: f32, size: egui::Vec2) {
        let fit = geo::fit_bounds(
            bounds,
            f64::from(size.x),
            f64::from(size.y),
            f64::from(padding),
            MIN_FIT_ZOOM,
            MAX_FIT_ZOOM,
        );
        debug!(
            "Fitting map to ({:.2}, {:.2}) at zoom {:.2}",
            fit.center.latitude, fit.center.longitude, fit.zoom
        );

        self.memory
            .center_at(lon_lat(fit.center.longitude, fit.center.latitude));
        if self.memory.set_zoom(fit.zoom).is_err() {
            warn!("Map rejected zoom {:.2}", fit.zoom);
        }
    }
}

fn go_home(memory: &mut MapMemory, zoom: f64) {
    memory.follow_my_position();
    if memory.set_zoom(zoom).is_err() {
        warn!("Ignoring invalid default zoom {zoom}");
    }
}

impl MapSurface for MapView {
    type Handle = RouteId;

    fn draw_route(&mut self, path: &RoutePath) -> RouteId {
        self.next_route_id += 1;
        let id = RouteId(self.next_route_id);
        self.route = Some((id, *path));
        id
    }

    fn remove_route(&mut self, handle: RouteId) {
        if self.route.is_some_and(|(id, _)| id == handle) {
            self.route = None;
        }
    }

    fn fit_bounds(&mut self, bounds: &GeoBounds, padding_px: f32) {
        // Applied on the next frame, once the map's screen size is known
        self.pending_fit = Some((*bounds, padding_px));
    }
}
