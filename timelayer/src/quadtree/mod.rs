//! Quadtree tile addressing.
//!
//! The archive names tile assets by a recursive quadrant path rather
//! than by x/y/z. Each digit selects one of four sub-quadrants at
//! successive zoom levels, derived from the parity of the linear-grid
//! column and row at that level. The digit layout is the reverse
//! engineered "inverted row parity" variant: on odd rows the naive
//! interleaving's 2 and 3 are swapped.

use std::fmt;

use crate::coord::{tile_geo_size, DOMAIN_BOTTOM, DOMAIN_LEFT};

/// A quadrant path identifying one tile in the archive.
///
/// A string of digits in {0,1,2,3}, one per zoom level from the root
/// down to the target zoom (length is always `zoom + 1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuadAddress(String);

impl QuadAddress {
    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits, equal to `zoom + 1`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the address has no digits. Never the case for addresses
    /// produced by [`address_for`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QuadAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the quadrant digit for a linear-grid cell.
///
/// Depends only on the parity of the column and row. The XOR fold
/// swaps digits 2 and 3 on odd rows; this matches the deployed archive
/// and must not be "cleaned up" to the naive interleaving.
#[inline]
pub fn quadrant_digit(col: u64, row: u64) -> u8 {
    let sub_col = (col & 1) as u8;
    let sub_row = (row & 1) as u8;
    (sub_col | (sub_row << 1)) ^ sub_row
}

/// Derives the quadrant path for a point at the given zoom level.
///
/// For each level from 0 to `zoom` inclusive, the point's linear-grid
/// column and row are recomputed fresh against the ±180° root extent,
/// and one digit is appended. Pure and deterministic for any finite
/// input; no error conditions.
pub fn address_for(lat: f64, lon: f64, zoom: u8) -> QuadAddress {
    let mut digits = String::with_capacity(zoom as usize + 1);

    for z in 0..=zoom {
        let size = tile_geo_size(z);
        let col = ((lon - DOMAIN_LEFT) / size).floor() as u64;
        let row = ((lat - DOMAIN_BOTTOM) / size).floor() as u64;
        digits.push((b'0' + quadrant_digit(col, row)) as char);
    }

    QuadAddress(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_digit_four_cases() {
        assert_eq!(quadrant_digit(0, 0), 0);
        assert_eq!(quadrant_digit(1, 0), 1);
        assert_eq!(quadrant_digit(0, 1), 3);
        assert_eq!(quadrant_digit(1, 1), 2);
    }

    #[test]
    fn test_address_length_is_zoom_plus_one() {
        for zoom in [0u8, 1, 5, 12, 20] {
            let addr = address_for(-33.86, 151.2, zoom);
            assert_eq!(addr.len(), zoom as usize + 1);
        }
    }

    #[test]
    fn test_known_archive_address() {
        // Reference vector captured from the deployed service
        let addr = address_for(-33.457923889160156, 151.1445083618164, 20);
        assert_eq!(addr.as_str(), "012202011012213120030");
    }

    #[test]
    fn test_address_is_deterministic() {
        let a = address_for(12.345, -67.89, 15);
        let b = address_for(12.345, -67.89, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn test_root_level_digit() {
        // At zoom 0 the whole domain is one cell; every point gets
        // col 0, row 0 at the root
        let addr = address_for(40.0, -74.0, 0);
        assert_eq!(addr.as_str(), "0");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_digits_always_in_range(col in 0u64..1_000_000, row in 0u64..1_000_000) {
                let d = quadrant_digit(col, row);
                prop_assert!(d <= 3);
            }

            #[test]
            fn test_digit_depends_only_on_parity(col in 0u64..1_000_000, row in 0u64..1_000_000) {
                prop_assert_eq!(
                    quadrant_digit(col, row),
                    quadrant_digit(col & 1, row & 1)
                );
            }

            #[test]
            fn test_address_shape(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=21
            ) {
                let addr = address_for(lat, lon, zoom);
                prop_assert_eq!(addr.len(), zoom as usize + 1);
                prop_assert!(addr.as_str().bytes().all(|b| (b'0'..=b'3').contains(&b)));
            }
        }
    }
}
