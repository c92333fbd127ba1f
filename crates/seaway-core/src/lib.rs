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

//! Client-side core of the seaway route planner.
//!
//! This crate holds everything behind the map view that does not depend on
//! a GUI toolkit:
//!
//! - **Selection**: click-driven origin/destination state machine
//! - **Prediction**: delay and hazard requests with epoch fencing so a late
//!   response for an abandoned pair never overwrites a newer one
//! - **Route**: keeps a single route line on any [`route::MapSurface`]
//! - **Planner**: ties selection changes to predictions and the route line
//! - **Overlay**: view model for the prediction panel and its formatting
//! - **Drag**: viewport-clamped positioning of the floating panel
//! - **HTTP**: reqwest transport for the backend and the port catalog
//!
//! # Selecting a pair
//!
//! ```
//! use seaway_core::port::fallback_ports;
//! use seaway_core::selection::{SelectionMachine, Transition};
//!
//! let ports = fallback_ports();
//! let mut selection = SelectionMachine::new();
//!
//! selection.click(&ports[0]);
//! if let Transition::PairSelected(pair) = selection.click(&ports[1]) {
//!     println!("{} -> {}: {:.0} km", pair.origin.name, pair.destination.name,
//!         pair.great_circle_km().unwrap_or_default());
//! }
//! ```
//!
//! # Dragging the panel
//!
//! ```
//! use seaway_core::drag::{DragController, Point, PointerSource, Rect, Size};
//!
//! let viewport = Size::new(1280.0, 800.0);
//! let panel = Size::new(320.0, 240.0);
//! let mut drag = DragController::default();
//!
//! let min = drag.position(panel, viewport);
//! drag.begin_drag(PointerSource::Mouse, Point::new(min.x + 10.0, min.y + 10.0), Rect { min, size: panel });
//! let moved = drag.update_drag(PointerSource::Mouse, Point::new(-500.0, -500.0), panel, viewport);
//! assert_eq!(moved, Some(Point::new(8.0, 8.0)));
//! drag.end_drag(PointerSource::Mouse);
//! ```

pub mod drag;
pub mod events;
pub mod geo;
pub mod http;
pub mod overlay;
pub mod planner;
pub mod port;
pub mod prediction;
pub mod route;
pub mod selection;

pub use events::{AppEvent, EventBus};
pub use geo::{haversine_km, Coordinates, GeoBounds};
pub use planner::RoutePlanner;
pub use port::{Port, PortPair};
pub use prediction::{PredictionOrchestrator, PredictionParams, PredictionTransport, TransportError};
pub use route::{MapSurface, RenderOutcome, RouteRenderer, RoutePath};
pub use selection::{Selection, SelectionMachine, Transition};
