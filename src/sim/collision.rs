//! Axis-aligned bounding boxes
//!
//! Everything on the board is a rectangle in canvas space. Overlap is strict:
//! rectangles that only touch do not collide.

use glam::Vec2;

/// Axis-aligned rectangle (top-left corner + extents)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    /// Create a box; negative extents are clamped to zero
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Box at `pos + inset` with the given size
    pub fn at(pos: Vec2, inset: Vec2, size: Vec2) -> Self {
        let corner = pos + inset;
        Self::new(corner.x, corner.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True iff the boxes intersect on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self, other)
    }
}

/// Strict separating-axis overlap test
///
/// Boxes that only touch count as separated: a shared edge
/// (`a.x + a.width == b.x`) or a zero-area box lying on an edge never
/// overlaps. A zero-area box strictly inside another one does.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}
