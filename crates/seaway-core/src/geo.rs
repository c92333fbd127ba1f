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

//! Great-circle distance and Web Mercator projection helpers.
//!
//! All coordinates are WGS84 degrees. Distances use a spherical Earth of mean
//! radius 6371 km, which is what the prediction backend expects.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per nautical mile.
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// Size of a map tile in pixels at every zoom level.
pub const TILE_SIZE_PX: f64 = 256.0;

// Web Mercator is undefined at the poles
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Calculate distance between two lat/lon points using the Haversine formula (in km).
#[must_use]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Convert nautical miles to kilometres.
#[must_use]
pub fn nautical_miles_to_km(nm: f64) -> f64 {
    nm * KM_PER_NAUTICAL_MILE
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box containing both points.
    #[must_use]
    pub fn from_points(a: Coordinates, b: Coordinates) -> Self {
        Self {
            south: a.latitude.min(b.latitude),
            west: a.longitude.min(b.longitude),
            north: a.latitude.max(b.latitude),
            east: a.longitude.max(b.longitude),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }
}

/// Web Mercator projection utilities.
///
/// Coordinates are expressed in "world units" where the whole map spans
/// `[0, 1]` on both axes at zoom 0; multiply by `2^zoom * TILE_SIZE_PX` to
/// get pixels.
#[derive(Debug)]
pub struct WebMercator;

impl WebMercator {
    /// Convert longitude to a world X coordinate (0.0 to 1.0).
    #[must_use]
    pub fn lon_to_x(lon: f64) -> f64 {
        (lon + 180.0) / 360.0
    }

    /// Convert latitude to a world Y coordinate (0.0 to 1.0, north at the top).
    #[must_use]
    pub fn lat_to_y(lat: f64) -> f64 {
        let lat_rad = lat
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
    }

    /// Convert a world X coordinate back to longitude.
    #[must_use]
    pub fn x_to_lon(x: f64) -> f64 {
        x * 360.0 - 180.0
    }

    /// Convert a world Y coordinate back to latitude.
    #[must_use]
    pub fn y_to_lat(y: f64) -> f64 {
        (std::f64::consts::PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
    }
}

/// Map centre and zoom level that frame a set of bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFit {
    pub center: Coordinates,
    pub zoom: f64,
}

/// Compute the centre and (fractional) zoom that fit `bounds` inside a
/// `width` x `height` pixel view, keeping `padding` pixels free on every side.
///
/// The zoom is clamped to `[min_zoom, max_zoom]`; a degenerate box (both
/// points identical) yields `max_zoom`.
#[must_use]
pub fn fit_bounds(
    bounds: &GeoBounds,
    width: f64,
    height: f64,
    padding: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> MapFit {
    let x_min = WebMercator::lon_to_x(bounds.west);
    let x_max = WebMercator::lon_to_x(bounds.east);
    let y_min = WebMercator::lat_to_y(bounds.north);
    let y_max = WebMercator::lat_to_y(bounds.south);

    let center = Coordinates::new(
        WebMercator::y_to_lat((y_min + y_max) / 2.0),
        WebMercator::x_to_lon((x_min + x_max) / 2.0),
    );

    let usable_width = (width - 2.0 * padding).max(1.0);
    let usable_height = (height - 2.0 * padding).max(1.0);
    let span_x = (x_max - x_min) * TILE_SIZE_PX;
    let span_y = (y_max - y_min) * TILE_SIZE_PX;

    let zoom_x = if span_x > 0.0 {
        (usable_width / span_x).log2()
    } else {
        f64::INFINITY
    };
    let zoom_y = if span_y > 0.0 {
        (usable_height / span_y).log2()
    } else {
        f64::INFINITY
    };

    let zoom = zoom_x.min(zoom_y);
    let zoom = if zoom.is_finite() {
        zoom.clamp(min_zoom, max_zoom)
    } else {
        max_zoom
    };

    MapFit { center, zoom }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let distance = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((distance - 111.19).abs() < 0.5);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let singapore = Coordinates::new(1.29, 103.85);
        assert!(singapore.distance_km(&singapore).abs() < f64::EPSILON);
    }

    #[test]
    fn test_singapore_to_rotterdam() {
        let distance = haversine_km(1.29, 103.85, 51.91, 4.47);
        assert!((distance - 10_536.0).abs() < 50.0);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_km(33.77, -118.19, 40.73, -73.93);
        let b = haversine_km(40.73, -73.93, 33.77, -118.19);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_nautical_miles_to_km() {
        assert!((nautical_miles_to_km(100.0) - 185.2).abs() < 1e-9);
    }

    #[test]
    fn test_mercator_round_trip() {
        let lat = WebMercator::y_to_lat(WebMercator::lat_to_y(51.9));
        let lon = WebMercator::x_to_lon(WebMercator::lon_to_x(4.47));
        assert!((lat - 51.9).abs() < 1e-9);
        assert!((lon - 4.47).abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds_contains_both_points() {
        let a = Coordinates::new(1.29, 103.85);
        let b = Coordinates::new(51.91, 4.47);
        let bounds = GeoBounds::from_points(a, b);
        let fit = fit_bounds(&bounds, 1200.0, 800.0, 40.0, 2.0, 18.0);

        assert!(bounds.contains(fit.center));

        // Projected span at the chosen zoom must fit inside the padded view
        let scale = 2_f64.powf(fit.zoom) * TILE_SIZE_PX;
        let span_x = (WebMercator::lon_to_x(bounds.east) - WebMercator::lon_to_x(bounds.west)) * scale;
        let span_y = (WebMercator::lat_to_y(bounds.south) - WebMercator::lat_to_y(bounds.north)) * scale;
        assert!(span_x <= 1200.0 - 80.0 + 1e-6);
        assert!(span_y <= 800.0 - 80.0 + 1e-6);
    }

    #[test]
    fn test_fit_bounds_single_point_uses_max_zoom() {
        let p = Coordinates::new(50.9, -1.4);
        let fit = fit_bounds(&GeoBounds::from_points(p, p), 800.0, 600.0, 40.0, 2.0, 18.0);
        assert!((fit.zoom - 18.0).abs() < f64::EPSILON);
    }
}
