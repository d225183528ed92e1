//! Rail geometry
//!
//! The rail is a rectangle wrapped around the grid and walked clockwise from
//! the top-left corner. A scalar rail position maps to one of four sides:
//! - top: `[0, w)`, x grows left to right
//! - right: `[w, w + h)`, y grows top to bottom
//! - bottom: `[w + h, 2w + h)`, x shrinks right to left
//! - left: `[2w + h, 2w + 2h)`, y shrinks bottom to top
//!
//! The `index` of a position is the column (top/bottom) or row (left/right)
//! it faces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_rail;

/// Grid edge a rail position faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Clockwise order starting at the top-left corner
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

/// A rail position resolved against the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RailPoint {
    pub side: Side,
    /// Column for top/bottom, row for left/right
    pub index: usize,
    /// Plane position in cell units, origin at the grid's top-left corner
    pub pos: Vec2,
}

/// Rail length around a square grid of `size`
#[inline]
pub fn perimeter_for(size: usize) -> f32 {
    (4 * size) as f32
}

/// Rail position of the `k`-th cell center
#[inline]
pub fn cell_center(k: i64) -> f32 {
    k as f32 + 0.5
}

/// Map a rail position to the side, index and plane point it faces
pub fn map_position(progress: f32, perimeter: f32, width: usize, height: usize) -> RailPoint {
    let p = if perimeter > 0.0 {
        wrap_rail(progress, perimeter)
    } else {
        0.0
    };
    let w = width as f32;
    let h = height as f32;

    let (side, pos, along) = if p < w {
        (Side::Top, Vec2::new(p, 0.0), p)
    } else if p < w + h {
        let y = p - w;
        (Side::Right, Vec2::new(w, y), y)
    } else if p < 2.0 * w + h {
        let x = w - (p - (w + h));
        (Side::Bottom, Vec2::new(x, h), x)
    } else {
        let y = h - (p - (2.0 * w + h));
        (Side::Left, Vec2::new(0.0, y), y)
    };

    RailPoint {
        side,
        // `along` is never negative here, so the cast floors
        index: along.floor() as usize,
        pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_side_boundaries() {
        let perim = perimeter_for(11);
        assert_eq!(map_position(0.0, perim, 11, 11).side, Side::Top);
        assert_eq!(map_position(10.99, perim, 11, 11).side, Side::Top);
        assert_eq!(map_position(11.0, perim, 11, 11).side, Side::Right);
        assert_eq!(map_position(22.0, perim, 11, 11).side, Side::Bottom);
        assert_eq!(map_position(33.0, perim, 11, 11).side, Side::Left);
        assert_eq!(map_position(43.99, perim, 11, 11).side, Side::Left);
    }

    #[test]
    fn test_reverse_segments() {
        let perim = perimeter_for(11);
        // Bottom runs right to left
        let first = map_position(22.5, perim, 11, 11);
        let last = map_position(32.5, perim, 11, 11);
        assert_eq!(first.index, 10);
        assert_eq!(last.index, 0);
        // Left runs bottom to top
        let first = map_position(33.5, perim, 11, 11);
        let last = map_position(43.5, perim, 11, 11);
        assert_eq!(first.index, 10);
        assert_eq!(last.index, 0);
        assert_eq!(last.pos, Vec2::new(0.0, 0.5));
    }

    #[test]
    fn test_wraps_progress() {
        let perim = perimeter_for(11);
        let a = map_position(5.5, perim, 11, 11);
        assert_eq!(map_position(5.5 + perim, perim, 11, 11), a);
        assert_eq!(map_position(5.5 - perim, perim, 11, 11), a);
        assert_eq!(a.side, Side::Top);
        assert_eq!(a.index, 5);
    }

    #[test]
    fn test_reproducible() {
        let perim = perimeter_for(7);
        for i in 0..280 {
            let p = i as f32 * 0.1;
            assert_eq!(map_position(p, perim, 7, 7), map_position(p, perim, 7, 7));
        }
    }

    proptest! {
        #[test]
        fn prop_cell_centers_face_their_cell(size in 1usize..16, k_frac in 0.0f64..1.0) {
            let perim = perimeter_for(size);
            let k = ((k_frac * (4 * size) as f64) as usize).min(4 * size - 1);
            let point = map_position(cell_center(k as i64), perim, size, size);
            let s = size;

            prop_assert!(point.index < size);
            let (expected_side, expected_index) = match k / s {
                0 => (Side::Top, k),
                1 => (Side::Right, k - s),
                2 => (Side::Bottom, 3 * s - k - 1),
                _ => (Side::Left, 4 * s - k - 1),
            };
            prop_assert_eq!(point.side, expected_side);
            prop_assert_eq!(point.index, expected_index);

            // Top/bottom vary the column, left/right vary the row
            let lane = match point.side {
                Side::Top | Side::Bottom => point.pos.x,
                Side::Left | Side::Right => point.pos.y,
            };
            prop_assert!(lane >= point.index as f32 && lane < point.index as f32 + 1.0);
        }
    }
}
