//! Error type shared by the grid model, the search forest and the solver.

use thiserror::Error;

/// Every failure the solver and its collaborators can report.
///
/// Illegal successor grids produced during search are not errors: the solver
/// discards them silently. `InvalidState` is only raised for the initial grid.
#[derive(Error, Debug)]
pub enum Error {
    #[error("initial grid is invalid (overlapping or out-of-bounds cells)")]
    InvalidState,

    #[error("piece index {index} out of range, grid has {count} pieces")]
    PieceIndex { index: usize, count: usize },

    #[error("unsupported key symmetry: {0:?}")]
    UnsupportedSymmetry(String),

    #[error("reached end of tree after {depth} levels, no more states to explore")]
    Exhausted { depth: usize },

    #[error("accessing optimized-out state {index}, current level starts at {first}")]
    OptimizedOut { index: usize, first: usize },

    #[error("index {index} out of range, forest holds {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no last index in an empty search forest")]
    EmptyForest,

    #[error("move {step} leads to an invalid grid")]
    IllegalMove { step: usize },

    #[error("unknown puzzle: {0:?}")]
    UnknownPuzzle(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
