//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (shooters in spawn order, rail in clockwise order)
//! - No rendering or platform dependencies

pub mod error;
pub mod level;
pub mod rail;
pub mod scan;
pub mod solver;
pub mod state;
pub mod tick;

pub use error::{GridError, SolveError};
pub use level::generate_level;
pub use rail::{RailPoint, Side, cell_center, map_position, perimeter_for};
pub use scan::{find_exposed, scan_bounds};
pub use solver::{ShooterManifest, solve};
pub use state::{
    Cell, GameState, Grid, Inventory, PixelColor, SessionPhase, Shooter, ShooterState, Snapshot,
};
pub use tick::{Hit, TickInput, TickReport, tick};
