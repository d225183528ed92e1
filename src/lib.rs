//! Pixel Flow - A rail-shooter pixel puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rail geometry, visibility, solver, game loop)
//! - `settings`: Data-driven configuration
//!
//! Rendering, audio and input live outside this crate. A presentation layer
//! reads [`sim::Snapshot`] values and issues intents on [`sim::GameState`].

pub mod settings;
pub mod sim;

pub use settings::{Pace, Settings};

/// Game configuration constants (reference configuration)
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side length of the square pixel grid
    pub const GRID_SIZE: usize = 11;
    /// Number of parallel inventory lanes
    pub const LANE_COUNT: usize = 4;
    /// Maximum shooters on the rail at once
    pub const MAX_ACTIVE_SHOOTERS: usize = 4;

    /// Rail speed in grid cells per second
    pub const RAIL_SPEED: f32 = 6.0;
    /// Score awarded for every cleared pixel
    pub const SCORE_PER_HIT: u64 = 10;

    /// Solver gives up after this many peeling passes
    pub const SOLVER_PASS_LIMIT: usize = 200;
}

/// Wrap a rail position into `[0, perimeter)`
#[inline]
pub fn wrap_rail(position: f32, perimeter: f32) -> f32 {
    let wrapped = position.rem_euclid(perimeter);
    // rem_euclid can round up to exactly `perimeter` for tiny negative inputs
    if wrapped >= perimeter { 0.0 } else { wrapped }
}
