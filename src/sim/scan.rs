//! Line-of-sight visibility from the rail
//!
//! A shot travels straight in from one edge and strikes the first active
//! cell on its row or column. It does not reach the far wall: from the top
//! and left it may go one row/column past the center line, from the bottom
//! and right it stops one short of it. The game loop and the solver share
//! this rule, so it must not drift between them.

use std::ops::RangeInclusive;

use super::rail::Side;
use super::state::{Cell, Grid};

/// Rows (top/bottom) or columns (left/right) a scan from `side` covers,
/// listed from the edge inward
pub fn scan_bounds(size: usize, side: Side) -> RangeInclusive<usize> {
    let center = size / 2;
    match side {
        Side::Top | Side::Left => 0..=(center + 1).min(size.saturating_sub(1)),
        Side::Bottom | Side::Right => center.saturating_sub(1)..=size.saturating_sub(1),
    }
}

/// First active cell visible from `side` along line `index`
pub fn find_exposed(grid: &Grid, side: Side, index: usize) -> Option<&Cell> {
    let size = grid.size();
    if index >= size {
        return None;
    }

    let span = scan_bounds(size, side);
    let line = |depth: usize| match side {
        Side::Top | Side::Bottom => grid.get(depth, index),
        Side::Left | Side::Right => grid.get(index, depth),
    };

    match side {
        Side::Top | Side::Left => span.filter_map(line).find(|c| c.active),
        Side::Bottom | Side::Right => span.rev().filter_map(line).find(|c| c.active),
    }
}
