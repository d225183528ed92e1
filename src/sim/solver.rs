//! Perimeter-peeling solver
//!
//! Works out a shooter manifest that clears a grid. Each pass looks at what
//! the rail can see right now, picks the color with the most exposed pixels,
//! and issues one shooter carrying exactly that many shots. Those pixels are
//! then peeled off a working copy and the next pass starts.
//!
//! Ties between colors go to whichever color was seen first while walking
//! the rail: sides top, right, bottom, left, indices ascending.

use serde::{Deserialize, Serialize};

use super::error::SolveError;
use super::rail::Side;
use super::scan::find_exposed;
use super::state::{Grid, PixelColor};

/// One solver pass: a shooter to queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShooterManifest {
    pub color: PixelColor,
    /// Also the shooter's max ammo
    pub ammo: u32,
}

/// Distinct exposed cells as `(row, col, color)`, in rail order
fn exposed_cells(grid: &Grid) -> Vec<(usize, usize, PixelColor)> {
    let size = grid.size();
    let mut seen = vec![false; size * size];
    let mut exposed = Vec::new();

    for side in Side::ALL {
        for index in 0..size {
            if let Some(cell) = find_exposed(grid, side, index) {
                let slot = cell.row * size + cell.col;
                // Corner pixels show up from two sides
                if !seen[slot] {
                    seen[slot] = true;
                    exposed.push((cell.row, cell.col, cell.color));
                }
            }
        }
    }
    exposed
}

/// Color with the strictly highest count; earlier colors win ties
fn dominant_color(exposed: &[(usize, usize, PixelColor)]) -> Option<(PixelColor, u32)> {
    let mut tally: Vec<(PixelColor, u32)> = Vec::with_capacity(PixelColor::PLAYABLE.len());
    for &(_, _, color) in exposed {
        match tally.iter_mut().find(|(c, _)| *c == color) {
            Some((_, count)) => *count += 1,
            None => tally.push((color, 1)),
        }
    }

    let mut best: Option<(PixelColor, u32)> = None;
    for (color, count) in tally {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((color, count));
        }
    }
    best
}

/// Compute the manifest for `grid`. The input is never modified.
pub fn solve(grid: &Grid, pass_limit: usize) -> Result<Vec<ShooterManifest>, SolveError> {
    if let Some(bad) = grid.active_cells().find(|c| !c.color.is_playable()) {
        return Err(SolveError::InvalidCell {
            row: bad.row,
            col: bad.col,
        });
    }

    let mut work = grid.clone();
    let mut manifest = Vec::new();

    for _pass in 0..pass_limit {
        let exposed = exposed_cells(&work);

        let Some((color, ammo)) = dominant_color(&exposed) else {
            let remaining = work.active_count();
            if remaining > 0 {
                return Err(SolveError::Stuck { remaining });
            }
            log::debug!("Solved grid with {} shooters", manifest.len());
            return Ok(manifest);
        };

        for &(row, col, c) in &exposed {
            if c == color {
                work.deactivate(row, col);
            }
        }
        manifest.push(ShooterManifest { color, ammo });
    }

    let remaining = work.active_count();
    if remaining == 0 {
        return Ok(manifest);
    }
    Err(SolveError::PassLimit {
        limit: pass_limit,
        remaining,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::consts::SOLVER_PASS_LIMIT;
    use crate::sim::level::generate_level;
    use proptest::prelude::*;

    fn manifest(pattern: &[&str]) -> Vec<ShooterManifest> {
        solve(&Grid::from_pattern(pattern).unwrap(), SOLVER_PASS_LIMIT).unwrap()
    }

    fn entry(color: PixelColor, ammo: u32) -> ShooterManifest {
        ShooterManifest { color, ammo }
    }

    #[test]
    fn test_single_color_ring() {
        assert_eq!(
            manifest(&["RRR", "R.R", "RRR"]),
            vec![entry(PixelColor::Red, 8)]
        );
    }

    #[test]
    fn test_empty_grid() {
        assert!(solve(&Grid::empty(11), SOLVER_PASS_LIMIT).unwrap().is_empty());
    }

    #[test]
    fn test_concentric_rings() {
        let m = manifest(&["RRRRR", "RBBBR", "RBGBR", "RBBBR", "RRRRR"]);
        assert_eq!(
            m,
            vec![
                entry(PixelColor::Red, 16),
                entry(PixelColor::Blue, 8),
                entry(PixelColor::Green, 1),
            ]
        );
    }

    #[test]
    fn test_only_exposed_cells_counted() {
        // The red is boxed in by blues on every line that reaches it
        let m = manifest(&["..B..", ".BRB.", "..B..", ".....", "....."]);
        assert_eq!(m, vec![entry(PixelColor::Blue, 4), entry(PixelColor::Red, 1)]);
    }

    #[test]
    fn test_largest_group_first() {
        let m = manifest(&["GGG", "...", "..R"]);
        assert_eq!(m[0], entry(PixelColor::Green, 3));
        assert_eq!(m[1], entry(PixelColor::Red, 1));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        // Green sits in column 0 and is met first on the top side
        let m = manifest(&["G.R", "...", "..."]);
        assert_eq!(m, vec![entry(PixelColor::Green, 1), entry(PixelColor::Red, 1)]);
        let m = manifest(&["R.G", "...", "..."]);
        assert_eq!(m, vec![entry(PixelColor::Red, 1), entry(PixelColor::Green, 1)]);
    }

    #[test]
    fn test_input_untouched() {
        let grid = Grid::from_pattern(&["RGB", "YWP", "ORG"]).unwrap();
        let before = grid.clone();
        solve(&grid, SOLVER_PASS_LIMIT).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_invalid_cell_rejected() {
        // A colorless active cell can only arrive from outside, e.g. bad JSON
        let grid = Grid::from_pattern(&["R..", "...", "..."]).unwrap();
        let mut value = serde_json::to_value(grid).unwrap();
        value["cells"][4]["active"] = serde_json::Value::Bool(true);
        let grid: Grid = serde_json::from_value(value).unwrap();
        assert_eq!(
            solve(&grid, SOLVER_PASS_LIMIT),
            Err(SolveError::InvalidCell { row: 1, col: 1 })
        );
    }

    #[test]
    fn test_pass_limit() {
        // Four colors, one pixel each, cannot finish in two passes
        let grid = Grid::from_pattern(&["R..G", "....", "....", "B..Y"]).unwrap();
        assert_eq!(
            solve(&grid, 2),
            Err(SolveError::PassLimit {
                limit: 2,
                remaining: 2
            })
        );
        assert_eq!(solve(&grid, 4).unwrap().len(), 4);
    }

    #[test]
    fn test_generated_level_solves() {
        for seed in 0..20 {
            let grid = generate_level(11, seed);
            let m = solve(&grid, SOLVER_PASS_LIMIT).unwrap();
            let total: u32 = m.iter().map(|e| e.ammo).sum();
            assert_eq!(total as usize, grid.active_count());
        }
    }

    /// Square grids of side 1 to 8 in any mix of colors and gaps
    pub(crate) fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..9).prop_flat_map(|size| {
            prop::collection::vec(0usize..=PixelColor::PLAYABLE.len(), size * size).prop_map(
                move |picks| {
                    Grid::from_fn(size, |r, c| match picks[r * size + c] {
                        0 => PixelColor::None,
                        n => PixelColor::PLAYABLE[n - 1],
                    })
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_ammo_matches_pixels(grid in arb_grid()) {
            let m = solve(&grid, SOLVER_PASS_LIMIT).unwrap();
            for color in PixelColor::PLAYABLE {
                let ammo: u32 = m.iter().filter(|e| e.color == color).map(|e| e.ammo).sum();
                let pixels = grid.active_cells().filter(|c| c.color == color).count();
                prop_assert_eq!(ammo as usize, pixels);
            }
            prop_assert!(m.iter().all(|e| e.ammo > 0 && e.color.is_playable()));
        }
    }
}
