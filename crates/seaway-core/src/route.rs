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

//! Route line between the selected ports.

use log::debug;

use crate::geo::{Coordinates, GeoBounds};
use crate::port::PortPair;

/// Screen padding kept around the route when the view is fitted to it.
pub const ROUTE_PADDING_PX: f32 = 40.0;

/// Straight two-point path drawn between origin and destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePath {
    pub from: Coordinates,
    pub to: Coordinates,
}

impl RoutePath {
    /// `None` when either port has no coordinates.
    #[must_use]
    pub fn from_pair(pair: &PortPair) -> Option<Self> {
        let (from, to) = pair.coordinates()?;
        Some(Self { from, to })
    }

    #[must_use]
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::from_points(self.from, self.to)
    }
}

/// Map that can show a route line and move its viewport.
pub trait MapSurface {
    /// Identifies a drawn route so it can be removed again.
    type Handle;

    fn draw_route(&mut self, path: &RoutePath) -> Self::Handle;
    fn remove_route(&mut self, handle: Self::Handle);
    fn fit_bounds(&mut self, bounds: &GeoBounds, padding_px: f32);
}

/// What a call to [`RouteRenderer::render`] did to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A new route was drawn and the view fitted to it.
    Drawn,
    /// The requested route is already on the map.
    Unchanged,
    /// The previous route was removed and nothing replaced it.
    Retracted,
    /// Nothing drawn before or after.
    Nothing,
}

/// Keeps at most one route on a [`MapSurface`].
#[derive(Debug)]
pub struct RouteRenderer<H> {
    drawn: Option<(RoutePath, H)>,
}

impl<H> Default for RouteRenderer<H> {
    fn default() -> Self {
        Self { drawn: None }
    }
}

impl<H> RouteRenderer<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route currently on the map.
    #[must_use]
    pub fn current(&self) -> Option<&RoutePath> {
        self.drawn.as_ref().map(|(path, _)| path)
    }

    /// Bring the map in line with `pair`.
    ///
    /// Rendering the same pair again is a no-op. Clearing the pair removes
    /// the line without touching the viewport.
    pub fn render<S>(&mut self, surface: &mut S, pair: Option<&PortPair>) -> RenderOutcome
    where
        S: MapSurface<Handle = H>,
    {
        let wanted = pair.and_then(RoutePath::from_pair);

        if wanted.is_some() && wanted.as_ref() == self.current() {
            return RenderOutcome::Unchanged;
        }

        let retracted = match self.drawn.take() {
            Some((_, handle)) => {
                surface.remove_route(handle);
                true
            }
            None => false,
        };

        match wanted {
            Some(path) => {
                debug!(
                    "Drawing route ({:.2}, {:.2}) -> ({:.2}, {:.2})",
                    path.from.latitude, path.from.longitude, path.to.latitude, path.to.longitude
                );
                let handle = surface.draw_route(&path);
                surface.fit_bounds(&path.bounds(), ROUTE_PADDING_PX);
                self.drawn = Some((path, handle));
                RenderOutcome::Drawn
            }
            None if retracted => RenderOutcome::Retracted,
            None => RenderOutcome::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{fallback_ports, Port};

    #[derive(Default)]
    struct FakeMap {
        next_id: u32,
        lines: Vec<(u32, RoutePath)>,
        fits: Vec<(GeoBounds, f32)>,
    }

    impl MapSurface for FakeMap {
        type Handle = u32;

        fn draw_route(&mut self, path: &RoutePath) -> u32 {
            self.next_id += 1;
            self.lines.push((self.next_id, *path));
            self.next_id
        }

        fn remove_route(&mut self, handle: u32) {
            self.lines.retain(|(id, _)| *id != handle);
        }

        fn fit_bounds(&mut self, bounds: &GeoBounds, padding_px: f32) {
            self.fits.push((*bounds, padding_px));
        }
    }

    fn pair(a: usize, b: usize) -> PortPair {
        let ports = fallback_ports();
        PortPair {
            origin: ports[a].clone(),
            destination: ports[b].clone(),
        }
    }

    #[test]
    fn test_draws_and_fits_with_padding() {
        let mut map = FakeMap::default();
        let mut renderer = RouteRenderer::new();

        assert_eq!(renderer.render(&mut map, Some(&pair(0, 1))), RenderOutcome::Drawn);
        assert_eq!(map.lines.len(), 1);
        assert_eq!(map.fits.len(), 1);

        let (bounds, padding) = map.fits[0];
        assert!((padding - 40.0).abs() < f32::EPSILON);
        let path = map.lines[0].1;
        assert!(bounds.contains(path.from));
        assert!(bounds.contains(path.to));
    }

    #[test]
    fn test_same_pair_twice_draws_one_line() {
        let mut map = FakeMap::default();
        let mut renderer = RouteRenderer::new();

        renderer.render(&mut map, Some(&pair(0, 1)));
        assert_eq!(renderer.render(&mut map, Some(&pair(0, 1))), RenderOutcome::Unchanged);

        assert_eq!(map.lines.len(), 1);
        assert_eq!(map.fits.len(), 1);
    }

    #[test]
    fn test_new_pair_replaces_previous_line() {
        let mut map = FakeMap::default();
        let mut renderer = RouteRenderer::new();

        renderer.render(&mut map, Some(&pair(0, 1)));
        renderer.render(&mut map, Some(&pair(2, 3)));

        assert_eq!(map.lines.len(), 1);
        assert_eq!(Some(&map.lines[0].1), RoutePath::from_pair(&pair(2, 3)).as_ref());
    }

    #[test]
    fn test_clear_retracts_without_viewport_change() {
        let mut map = FakeMap::default();
        let mut renderer = RouteRenderer::new();

        renderer.render(&mut map, Some(&pair(0, 1)));
        assert_eq!(renderer.render(&mut map, None), RenderOutcome::Retracted);

        assert!(map.lines.is_empty());
        assert_eq!(map.fits.len(), 1);
        assert!(renderer.current().is_none());
        assert_eq!(renderer.render(&mut map, None), RenderOutcome::Nothing);
    }

    #[test]
    fn test_missing_coordinates_draw_nothing() {
        let mut map = FakeMap::default();
        let mut renderer = RouteRenderer::new();
        let mut blind = pair(0, 1);
        blind.origin = Port {
            coordinates: None,
            ..blind.origin
        };

        assert_eq!(renderer.render(&mut map, Some(&blind)), RenderOutcome::Nothing);
        assert!(map.lines.is_empty());
        assert!(map.fits.is_empty());
    }
}
