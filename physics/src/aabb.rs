//! Axis-aligned bounding boxes in world pixels

use std::ops::RangeInclusive;

/// Tolerance in tile units for deciding whether an edge sits on a tile boundary.
///
/// Positions are `f32`, so a box resting on row 5 of a 32px grid may have its
/// bottom at `159.99998`. Edges within this fraction of a tile from a boundary
/// count as flush.
pub const EDGE_EPSILON: f32 = 1e-4;

/// Box with a top-left origin; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Strict overlap test; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Copy of the box moved to a new x.
    pub fn with_x(&self, x: f32) -> Self {
        Self { x, ..*self }
    }

    /// Copy of the box moved to a new y.
    pub fn with_y(&self, y: f32) -> Self {
        Self { y, ..*self }
    }

    /// Columns and rows of tiles the box covers.
    ///
    /// Edges flush with a tile boundary do not cover the neighbouring tile.
    /// A degenerate box still covers the tile it sits in.
    pub fn tile_span(
        &self,
        tile_width: f32,
        tile_height: f32,
    ) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        (
            covered_span(self.x, self.right(), tile_width),
            covered_span(self.y, self.bottom(), tile_height),
        )
    }
}

/// First tile whose interior contains coordinates at or after `start`.
pub(crate) fn first_covered(start: f32, size: f32) -> i32 {
    ((start / size) + EDGE_EPSILON).floor() as i32
}

/// Last tile whose interior contains coordinates before `end`.
pub(crate) fn last_covered(end: f32, size: f32) -> i32 {
    ((end / size) - EDGE_EPSILON).ceil() as i32 - 1
}

/// Whether `edge` sits on a tile boundary.
pub(crate) fn on_boundary(edge: f32, size: f32) -> bool {
    let t = edge / size;
    (t - t.round()).abs() < EDGE_EPSILON
}

pub(crate) fn covered_span(start: f32, end: f32, size: f32) -> RangeInclusive<i32> {
    let first = first_covered(start, size);
    first..=last_covered(end, size).max(first)
}
