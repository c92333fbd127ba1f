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

//! Draggable panel positioning.
//!
//! A [`DragController`] owns the screen placement of one floating panel. The
//! panel starts anchored to a viewport corner; the first drag converts that
//! anchoring into an absolute top-left position so later moves are not fought
//! by the corner anchoring. Positions are always kept inside the viewport
//! minus a fixed margin.

use log::debug;

/// Gap kept between a dragged panel and the viewport edges.
pub const DEFAULT_MARGIN: f32 = 8.0;

/// Default distance from the anchoring corner for a panel that was never dragged.
pub const DEFAULT_ANCHOR_OFFSET: f32 = 16.0;

/// Screen-space point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Laid-out rectangle of the element being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Point,
    pub size: Size,
}

/// Viewport corner a panel can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Where a panel sits on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// `offset` pixels in from `corner` on both axes.
    Anchored { corner: Corner, offset: f32 },
    /// Absolute top-left position.
    Absolute(Point),
}

impl Placement {
    /// Resolve to an absolute top-left position for an element of `size`.
    #[must_use]
    pub fn top_left(&self, size: Size, viewport: Size) -> Point {
        match *self {
            Self::Absolute(p) => p,
            Self::Anchored { corner, offset } => {
                let right = viewport.width - size.width - offset;
                let bottom = viewport.height - size.height - offset;
                match corner {
                    Corner::TopLeft => Point::new(offset, offset),
                    Corner::TopRight => Point::new(right, offset),
                    Corner::BottomLeft => Point::new(offset, bottom),
                    Corner::BottomRight => Point::new(right, bottom),
                }
            }
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::Anchored {
            corner: Corner::BottomRight,
            offset: DEFAULT_ANCHOR_OFFSET,
        }
    }
}

/// Input device driving a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Pointer that started the drag; other pointers are ignored until release.
    pub source: PointerSource,
    /// Pointer position minus element top-left at drag start.
    pub offset: Point,
}

/// Pointer-to-position mapping for a single floating panel.
#[derive(Debug, Clone)]
pub struct DragController {
    placement: Placement,
    drag: Option<DragState>,
    margin: f32,
}

impl DragController {
    #[must_use]
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            drag: None,
            margin: DEFAULT_MARGIN,
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current top-left position for rendering.
    #[must_use]
    pub fn position(&self, size: Size, viewport: Size) -> Point {
        self.placement.top_left(size, viewport)
    }

    /// Start dragging from `pointer` with the element currently laid out at `element`.
    ///
    /// Returns `false` (and changes nothing) if another pointer already owns
    /// the drag.
    pub fn begin_drag(&mut self, source: PointerSource, pointer: Point, element: Rect) -> bool {
        if let Some(active) = &self.drag {
            debug!("Ignoring {source:?} drag start while {:?} drag is active", active.source);
            return false;
        }

        // Pin the panel where it is so the corner anchoring stops applying
        self.placement = Placement::Absolute(element.min);
        self.drag = Some(DragState {
            source,
            offset: Point::new(pointer.x - element.min.x, pointer.y - element.min.y),
        });
        true
    }

    /// Move the panel to follow `pointer`.
    ///
    /// Returns the new clamped top-left, or `None` if no drag owned by
    /// `source` is active.
    pub fn update_drag(
        &mut self,
        source: PointerSource,
        pointer: Point,
        element: Size,
        viewport: Size,
    ) -> Option<Point> {
        let drag = self.drag.filter(|d| d.source == source)?;

        let candidate = Point::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
        let position = Point::new(
            clamp_axis(candidate.x, element.width, viewport.width, self.margin),
            clamp_axis(candidate.y, element.height, viewport.height, self.margin),
        );

        self.placement = Placement::Absolute(position);
        Some(position)
    }

    /// Release the drag owned by `source`. Calling it when not dragging is a no-op.
    pub fn end_drag(&mut self, source: PointerSource) {
        if self.drag.is_some_and(|d| d.source == source) {
            self.drag = None;
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(Placement::default())
    }
}

// Lower bound wins when the element is wider than the viewport
fn clamp_axis(value: f32, element: f32, viewport: f32, margin: f32) -> f32 {
    let max = viewport - element - margin;
    value.min(max).max(margin)
}
