//! Tile grid calculation.
//!
//! Converts a geographic bounding box and zoom level into the set of
//! tiles covering the box. Tiles live on two grids at once: a linear
//! degree grid anchored to the archive's ±180° root extent (used for
//! quadtree addressing) and the standard Web Mercator slippy-map grid
//! (used for output paths). [`GridSpan`] computes both origins once and
//! maps local cells into either system.

mod types;

pub use types::{
    BoundingBox, GridCell, TileCoord, DOMAIN_BOTTOM, DOMAIN_LEFT, DOMAIN_RIGHT, DOMAIN_TOP,
};

use std::f64::consts::PI;

/// Returns the geographic size of one tile edge at the given zoom, in degrees.
#[inline]
pub fn tile_geo_size(zoom: u8) -> f64 {
    360.0 / 2.0_f64.powi(zoom as i32)
}

/// The tile grid covering a bounding box at one zoom level.
///
/// The box is silently expanded outward to whole-tile boundaries: start
/// indices are floors of the box edges against the root extent, counts
/// are ceilings of the box spans. Both tile-system origins are computed
/// from the *snapped* bottom-left corner, not the raw box, so they stay
/// aligned with the deployed directory scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpan {
    /// Zoom level this span was computed for.
    pub zoom: u8,
    /// First column on the linear degree grid.
    pub col_start: u32,
    /// Number of columns covering the box.
    pub col_count: u32,
    /// First row on the linear degree grid (counted from the south).
    pub row_start: u32,
    /// Number of rows covering the box.
    pub row_count: u32,
    /// Mercator X tile of the snapped bottom-left corner.
    pub x_tile_start: u32,
    /// Mercator Y tile of the snapped bottom-left corner.
    pub y_tile_start: u32,
}

impl GridSpan {
    /// Computes the grid covering `bounds` at `zoom`.
    ///
    /// Pure arithmetic; no error conditions. All intermediate values are
    /// f64 to reproduce the reference tile boundaries exactly.
    pub fn compute(bounds: &BoundingBox, zoom: u8) -> Self {
        let n = 2.0_f64.powi(zoom as i32);
        let size = 360.0 / n;

        let col_start = ((bounds.left - DOMAIN_LEFT) / size).floor() as u32;
        let col_count = ((bounds.right - bounds.left) / size).ceil() as u32;
        let row_start = ((bounds.bottom - DOMAIN_BOTTOM) / size).floor() as u32;
        let row_count = ((bounds.top - bounds.bottom) / size).ceil() as u32;

        // Snap the origin outward to the grid's cell boundaries before
        // deriving the Mercator origin. Using the raw box corner here
        // would shift output paths off the deployed layout.
        let lon_snapped = col_start as f64 * size + DOMAIN_LEFT;
        let lat_snapped = row_start as f64 * size + DOMAIN_BOTTOM;

        let x_tile_start = (n * ((lon_snapped + 180.0) / 360.0)).floor() as u32;
        let lat_rad = lat_snapped * PI / 180.0;
        let y_tile_start =
            (n * (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0).floor() as u32;

        Self {
            zoom,
            col_start,
            col_count,
            row_start,
            row_count,
            x_tile_start,
            y_tile_start,
        }
    }

    /// Total number of tiles in the span.
    pub fn tile_count(&self) -> u64 {
        self.col_count as u64 * self.row_count as u64
    }

    /// Returns the (lat, lon) of a cell's southwest corner, in degrees.
    pub fn cell_origin(&self, cell: GridCell) -> (f64, f64) {
        let size = tile_geo_size(self.zoom);
        let lon = (self.col_start + cell.col) as f64 * size + DOMAIN_LEFT;
        let lat = (self.row_start + cell.row) as f64 * size + DOMAIN_BOTTOM;
        (lat, lon)
    }

    /// Maps a local cell to its global Mercator tile coordinate.
    ///
    /// Local rows grow northward from the box's bottom edge while
    /// Mercator Y grows southward, so Y *decreases* as the row index
    /// increases. X is linear in longitude and simply offsets.
    pub fn tile_coord(&self, cell: GridCell) -> TileCoord {
        TileCoord {
            x: self.x_tile_start + cell.col,
            y: self.y_tile_start - cell.row,
            zoom: self.zoom,
        }
    }
}
