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

//! Port records as served by the port catalog.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A seaport that can be picked as a route endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Stable catalog identifier.
    pub id: String,
    /// Display name, also used as the lookup key by the prediction backend.
    pub name: String,
    /// Location of the port, when the catalog knows it.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub continent: String,
    /// Ports disabled by moderation are shown but cannot be selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Moderation audit trail; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action_at: Option<String>,
}

impl Port {
    #[must_use]
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64, continent: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            coordinates: Some(Coordinates::new(latitude, longitude)),
            continent: continent.to_string(),
            disabled: Some(false),
            last_action_by: None,
            last_action_at: None,
        }
    }

    /// Whether two records refer to the same port.
    ///
    /// Identity is the catalog id; the name is compared as well because some
    /// catalogs hand out several records for one physical port.
    #[must_use]
    pub fn is_same_port(&self, other: &Port) -> bool {
        self.id == other.id || self.name == other.name
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }
}

/// A completed origin/destination selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PortPair {
    pub origin: Port,
    pub destination: Port,
}

impl PortPair {
    /// Both endpoint coordinates, if the catalog provided them.
    #[must_use]
    pub fn coordinates(&self) -> Option<(Coordinates, Coordinates)> {
        Some((self.origin.coordinates?, self.destination.coordinates?))
    }

    /// Great-circle distance between the endpoints in kilometres.
    #[must_use]
    pub fn great_circle_km(&self) -> Option<f64> {
        self.coordinates().map(|(a, b)| a.distance_km(&b))
    }
}

/// Ports used when the catalog service cannot be reached.
#[must_use]
pub fn fallback_ports() -> Vec<Port> {
    vec![
        Port::new("1", "Singapore", 1.290_27, 103.851_959, "Asia"),
        Port::new("2", "Rotterdam", 51.905_445, 4.466_637, "Europe"),
        Port::new("3", "Shanghai", 31.224_361, 121.469_17, "Asia"),
        Port::new("4", "Los Angeles", 33.770_05, -118.193_741, "North America"),
        Port::new("5", "New York", 40.730_61, -73.935_242, "North America"),
        Port::new("6", "Southampton", 50.909_698, -1.404_351, "Europe"),
        Port::new("7", "Dubai", 25.276_987, 55.296_249, "Asia"),
        Port::new("8", "Mumbai", 19.076_09, 72.877_426, "Asia"),
        Port::new("9", "Sydney", -33.865_143, 151.2099, "Oceania"),
        Port::new("10", "Cape Town", -33.918_861, 18.4233, "Africa"),
    ]
}

/// Filter ports by a case-insensitive substring of their name or continent.
///
/// An empty or blank term returns every port.
#[must_use]
pub fn search_ports<'a>(ports: &'a [Port], term: &str) -> Vec<&'a Port> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return ports.iter().collect();
    }

    ports
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term) || p.continent.to_lowercase().contains(&term)
        })
        .collect()
}

/// Look up a port by exact display name.
#[must_use]
pub fn find_by_name<'a>(ports: &'a [Port], name: &str) -> Option<&'a Port> {
    ports.iter().find(|p| p.name == name)
}
