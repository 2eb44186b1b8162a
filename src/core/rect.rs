//! Axis-Aligned Rectangles
//!
//! Two rectangle flavours: `TileRect` in integer tile-grid units (static
//! level geometry) and `Rect` in float world units (entity bounds).
//! Both are min-corner anchored.

use glam::Vec2;
use serde::{Serialize, Deserialize};

/// An axis-aligned integer rectangle in tile-grid units.
///
/// Represents a maximal run of solid terrain after merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left edge (inclusive), in tiles.
    pub x: i32,
    /// Bottom edge (inclusive), in tiles.
    pub y: i32,
    /// Width in tiles.
    pub w: i32,
    /// Height in tiles.
    pub h: i32,
}

impl TileRect {
    /// Create a new tile rect.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn x_max(&self) -> i32 {
        self.x + self.w
    }

    /// Top edge (exclusive).
    #[inline]
    pub const fn y_max(&self) -> i32 {
        self.y + self.h
    }

    /// Number of tiles covered.
    #[inline]
    pub const fn area(&self) -> i32 {
        self.w * self.h
    }

    /// Whether a single grid cell lies inside this rect.
    #[inline]
    pub const fn contains_cell(&self, cx: i32, cy: i32) -> bool {
        cx >= self.x && cx < self.x_max() && cy >= self.y && cy < self.y_max()
    }

    /// Convert to a float rect in world units (1 tile = 1 unit).
    #[inline]
    pub fn to_rect(&self) -> Rect {
        Rect::new(Vec2::new(self.x as f32, self.y as f32), self.w as f32, self.h as f32)
    }
}

/// An axis-aligned float rectangle with its minimum corner at `min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Bottom-left corner in world units.
    pub min: Vec2,
    /// Width in world units.
    pub w: f32,
    /// Height in world units.
    pub h: f32,
}

impl Rect {
    /// Create a new rect from its bottom-left corner and size.
    pub const fn new(min: Vec2, w: f32, h: f32) -> Self {
        Self { min, w, h }
    }

    /// Left edge.
    #[inline]
    pub fn x_min(&self) -> f32 {
        self.min.x
    }

    /// Right edge.
    #[inline]
    pub fn x_max(&self) -> f32 {
        self.min.x + self.w
    }

    /// Bottom edge.
    #[inline]
    pub fn y_min(&self) -> f32 {
        self.min.y
    }

    /// Top edge.
    #[inline]
    pub fn y_max(&self) -> f32 {
        self.min.y + self.h
    }

    /// Strict overlap test: rects that merely share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        other.x_max() > self.x_min()
            && other.x_min() < self.x_max()
            && other.y_max() > self.y_min()
            && other.y_min() < self.y_max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_rect_edges() {
        let r = TileRect::new(2, 0, 4, 1);
        assert_eq!(r.x_max(), 6);
        assert_eq!(r.y_max(), 1);
        assert_eq!(r.area(), 4);
        assert!(r.contains_cell(2, 0));
        assert!(r.contains_cell(5, 0));
        assert!(!r.contains_cell(6, 0));
        assert!(!r.contains_cell(2, 1));
    }

    #[test]
    fn test_overlap_strictness() {
        let a = Rect::new(Vec2::ZERO, 1.0, 1.0);
        let touching = Rect::new(Vec2::new(1.0, 0.0), 1.0, 1.0);
        let penetrating = Rect::new(Vec2::new(0.9, 0.0), 1.0, 1.0);

        // Shared edge is not an overlap
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&penetrating));
        assert!(penetrating.overlaps(&a));
    }

    #[test]
    fn test_overlap_vertical() {
        let floor = TileRect::new(0, 0, 10, 1).to_rect();
        let standing = Rect::new(Vec2::new(3.0, 1.0), 1.0, 2.0);
        let sunk = Rect::new(Vec2::new(3.0, 0.8), 1.0, 2.0);

        assert!(!floor.overlaps(&standing));
        assert!(floor.overlaps(&sunk));
    }
}
