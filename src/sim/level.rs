//! Procedural level supply
//!
//! Draws a flask in the middle of the grid: a two-tone body below the
//! center, a narrow neck, a rim, a yellow glow around it and a sprinkle of
//! purple noise. Only the seed decides the result.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Grid, PixelColor};

/// Half-width of the flask body and rim
const BODY_HALF_WIDTH: i64 = 2;
/// Half-width of the neck
const NECK_HALF_WIDTH: i64 = 1;
/// Rows from the center up to the rim
const NECK_HEIGHT: i64 = 3;
/// Radius of the yellow glow
const GLOW_RADIUS: f32 = 4.0;
/// Glow starts below this row
const GLOW_TOP_ROW: i64 = 2;
/// Chance an empty cell near the flask becomes noise
const NOISE_CHANCE: f64 = 0.2;

/// Generate a level of `size` x `size` from `seed`
pub fn generate_level(size: usize, seed: u64) -> Grid {
    let mut rng = Pcg32::seed_from_u64(seed);
    let center = (size / 2) as i64;

    let grid = Grid::from_fn(size, |row, col| {
        let (row, col) = (row as i64, col as i64);
        let dx = (col - center).abs();
        let dy = (row - center).abs();
        let dist = ((dx * dx + dy * dy) as f32).sqrt();

        let shape = if row > center && dx <= BODY_HALF_WIDTH {
            if rng.random_bool(0.5) {
                PixelColor::Red
            } else {
                PixelColor::Orange
            }
        } else if row <= center && row > center - NECK_HEIGHT && dx <= NECK_HALF_WIDTH {
            PixelColor::Green
        } else if row == center - NECK_HEIGHT && dx <= BODY_HALF_WIDTH {
            PixelColor::White
        } else if dist < GLOW_RADIUS && row > GLOW_TOP_ROW {
            PixelColor::Yellow
        } else {
            PixelColor::None
        };

        if shape == PixelColor::None && dx < 4 && dy < 4 && rng.random_bool(NOISE_CHANCE) {
            PixelColor::Purple
        } else {
            shape
        }
    });

    log::info!(
        "Generated {}x{} level (seed {}): {} pixels",
        size,
        size,
        seed,
        grid.active_count()
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_level(11, 42), generate_level(11, 42));
    }

    #[test]
    fn test_seed_varies_body() {
        let differs = (1..10).any(|seed| generate_level(11, 0) != generate_level(11, seed));
        assert!(differs);
    }

    #[test]
    fn test_shape_landmarks() {
        let grid = generate_level(11, 7);
        // Neck just above center, rim three rows up
        assert_eq!(grid.get(5, 5).unwrap().color, PixelColor::Green);
        assert_eq!(grid.get(2, 5).unwrap().color, PixelColor::White);
        let body = grid.get(8, 5).unwrap().color;
        assert!(body == PixelColor::Red || body == PixelColor::Orange);
    }

    #[test]
    fn test_cells_respect_invariant() {
        for size in [1, 3, 11, 16] {
            let grid = generate_level(size, 3);
            assert_eq!(grid.cells().count(), size * size);
            assert!(grid.cells().all(|c| c.active == c.color.is_playable()));
        }
    }
}
