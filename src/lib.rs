//! Sliding-Block Puzzle Solver Library
//!
//! Finds a shortest sequence of unit moves taking a Klotski-style board to a
//! goal configuration, using an exhaustive breadth-first search over
//! symmetry-reduced board states.

pub mod error;
pub mod forest;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod puzzles;
pub mod solver;

pub use error::{Error, Result};
pub use geometry::{Direction, Position};
pub use grid::{Grid, Move, Symmetry};
pub use pieces::{Piece, PieceShape, PieceTag};
pub use solver::{replay, solve, Solution};

/// Answers whether a grid satisfies the search goal.
///
/// Implemented for any `Fn(&Grid) -> bool`, so a closure can be passed
/// directly to [`solve`].
pub trait Goal {
    fn is_reached(&self, grid: &Grid) -> bool;
}

impl<F> Goal for F
where
    F: Fn(&Grid) -> bool,
{
    fn is_reached(&self, grid: &Grid) -> bool {
        self(grid)
    }
}

/// Goal reached when the piece with identity `tag` has its anchor at `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceAt {
    pub tag: PieceTag,
    pub position: Position,
}

impl PieceAt {
    pub fn new(tag: PieceTag, position: impl Into<Position>) -> Self {
        Self {
            tag,
            position: position.into(),
        }
    }
}

impl Goal for PieceAt {
    fn is_reached(&self, grid: &Grid) -> bool {
        grid.piece(self.tag)
            .is_some_and(|piece| piece.position == self.position)
    }
}
