//! Error types for grid construction and solving

use thiserror::Error;

/// Failures reported by the peeling solver
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// An active cell carries no color, so no shooter could ever clear it
    #[error("active cell at ({row}, {col}) has no color")]
    InvalidCell {
        /// Row of the offending cell
        row: usize,
        /// Column of the offending cell
        col: usize,
    },

    /// No active cell is visible from the rail but some remain
    #[error("no exposed pixels left but {remaining} remain active")]
    Stuck {
        /// Active cells left in the working grid
        remaining: usize,
    },

    /// The pass limit ran out before the grid was cleared
    #[error("solver gave up after {limit} passes with {remaining} pixels left")]
    PassLimit {
        /// Pass limit that was hit
        limit: usize,
        /// Active cells left in the working grid
        remaining: usize,
    },
}

/// Failures building a grid from a text pattern or serialized cells
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Pattern had no rows
    #[error("pattern is empty")]
    Empty,

    /// A row length differs from the row count
    #[error("row {row} has {len} glyphs, expected {expected}")]
    NotSquare {
        /// Offending row
        row: usize,
        /// Its glyph count
        len: usize,
        /// Required glyph count
        expected: usize,
    },

    /// A glyph does not name a color
    #[error("unknown glyph {glyph:?} at ({row}, {col})")]
    UnknownGlyph {
        /// The glyph found
        glyph: char,
        /// Row of the glyph
        row: usize,
        /// Column of the glyph
        col: usize,
    },

    /// Serialized cell list does not fill the grid exactly
    #[error("grid of size {size} needs {expected} cells, found {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },

    /// Serialized cell sits out of row-major order
    #[error("cell {index} claims ({row}, {col})")]
    Misplaced { index: usize, row: usize, col: usize },
}
