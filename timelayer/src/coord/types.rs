//! Value types for the two tile coordinate systems.
//!
//! The archive addresses tiles on a *linear* degree grid over the root
//! extent, while output files are placed on the standard Web Mercator
//! (slippy-map) grid. The two grids are deliberately kept as distinct
//! types so cells from one are never used where the other is expected.

use std::fmt;

/// Western edge of the root tile, in degrees.
pub const DOMAIN_LEFT: f64 = -180.0;

/// Eastern edge of the root tile, in degrees.
pub const DOMAIN_RIGHT: f64 = 180.0;

/// Northern edge of the root tile, in degrees.
///
/// The archive's root tile is square in degree space, so its latitude
/// extent is the same ±180 pair as longitude. This is not a typo.
pub const DOMAIN_TOP: f64 = 180.0;

/// Southern edge of the root tile, in degrees.
pub const DOMAIN_BOTTOM: f64 = -180.0;

/// Geographic bounding box in degrees.
///
/// Invariants (`left < right`, `bottom < top`) are the caller's
/// responsibility; the grid math does not validate them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge in degrees.
    pub left: f64,
    /// Eastern edge in degrees.
    pub right: f64,
    /// Northern edge in degrees.
    pub top: f64,
    /// Southern edge in degrees.
    pub bottom: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four edges.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// A cell on the linear degree grid, relative to a [`GridSpan`]'s origin.
///
/// Used only for quadtree addressing; never for output placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Column offset from the span's western edge.
    pub col: u32,
    /// Row offset from the span's southern edge.
    pub row: u32,
}

/// A global Web Mercator (slippy-map) tile coordinate.
///
/// Used only for output placement; never for quadtree addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Column, linear in longitude (west to east).
    pub x: u32,
    /// Row, Mercator in latitude (north to south).
    pub y: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_new() {
        let b = BoundingBox::new(151.19, 151.21, -33.86, -33.88);
        assert_eq!(b.left, 151.19);
        assert_eq!(b.right, 151.21);
        assert_eq!(b.top, -33.86);
        assert_eq!(b.bottom, -33.88);
    }

    #[test]
    fn test_tile_coord_display() {
        let tile = TileCoord {
            x: 7,
            y: 5,
            zoom: 3,
        };
        assert_eq!(tile.to_string(), "3/7/5");
    }

    #[test]
    fn test_domain_is_square() {
        assert_eq!(DOMAIN_RIGHT - DOMAIN_LEFT, DOMAIN_TOP - DOMAIN_BOTTOM);
    }
}
