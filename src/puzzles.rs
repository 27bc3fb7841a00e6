//! Built-in puzzle instances.
//!
//! Each entry builds its initial grid on demand; shapes are created once per
//! build and shared by every piece using them.

use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::grid::{Grid, Symmetry};
use crate::pieces::{Piece, PieceShape, PieceTag};
use crate::PieceAt;

/// A named puzzle: initial grid, goal and preferred key symmetry.
pub struct Puzzle {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Grid,
    /// Identity and target anchor of the piece that must be moved.
    pub target: (PieceTag, Position),
    /// Horizontal folding is only sound when the goal is mirror-invariant.
    pub symmetry: Symmetry,
}

impl Puzzle {
    pub fn initial_grid(&self) -> Grid {
        (self.build)()
    }

    pub fn goal(&self) -> PieceAt {
        PieceAt::new(self.target.0, self.target.1)
    }
}

/// The classic "forget-me-not" layout: a 2x2 block, four vertical dominoes,
/// one horizontal domino and four unit squares on a 4x5 board. The 2x2 block
/// must reach the bottom-center exit.
pub const CLASSIC: Puzzle = Puzzle {
    name: "classic",
    description: "4x5 Klotski, move the 2x2 block to the bottom exit",
    build: classic,
    target: (PieceTag::new('A', 1), Position::new(1, 3)),
    symmetry: Symmetry::Horizontal,
};

/// Two obstacles narrow the middle column to a single-cell gate that the
/// vertical domino cannot pass.
pub const CORRIDOR: Puzzle = Puzzle {
    name: "corridor",
    description: "5x3 board with obstacles, squeeze a unit square past a domino",
    build: corridor,
    target: (PieceTag::new('A', 1), Position::new(4, 1)),
    symmetry: Symmetry::None,
};

/// A completely filled board: no piece can move, so the goal is unreachable.
pub const BLOCKED: Puzzle = Puzzle {
    name: "blocked",
    description: "2x2 board filled with unit squares, has no solution",
    build: blocked,
    target: (PieceTag::new('A', 1), Position::new(1, 1)),
    symmetry: Symmetry::None,
};

pub const PUZZLES: &[Puzzle] = &[CLASSIC, CORRIDOR, BLOCKED];

/// Looks up a built-in puzzle by name.
pub fn find(name: &str) -> Result<&'static Puzzle> {
    PUZZLES
        .iter()
        .find(|puzzle| puzzle.name == name)
        .ok_or_else(|| Error::UnknownPuzzle(name.to_string()))
}

fn classic() -> Grid {
    let square = PieceShape::rectangle(2, 2);
    let vertical = PieceShape::rectangle(1, 2);
    let horizontal = PieceShape::rectangle(2, 1);
    let unit = PieceShape::rectangle(1, 1);

    Grid::new(4, 5).with_pieces([
        Piece::new(PieceTag::new('A', 1), (1, 0), &square),
        Piece::new(PieceTag::new('B', 1), (0, 0), &vertical),
        Piece::new(PieceTag::new('B', 2), (3, 0), &vertical),
        Piece::new(PieceTag::new('B', 3), (0, 2), &vertical),
        Piece::new(PieceTag::new('B', 4), (3, 2), &vertical),
        Piece::new(PieceTag::new('C', 1), (1, 2), &horizontal),
        Piece::new(PieceTag::new('D', 1), (0, 4), &unit),
        Piece::new(PieceTag::new('D', 2), (1, 3), &unit),
        Piece::new(PieceTag::new('D', 3), (2, 3), &unit),
        Piece::new(PieceTag::new('D', 4), (3, 4), &unit),
    ])
}

fn corridor() -> Grid {
    let vertical = PieceShape::rectangle(1, 2);
    let unit = PieceShape::rectangle(1, 1);

    Grid::new(5, 3)
        .with_obstacles(&[Position::new(2, 0), Position::new(2, 2)])
        .with_pieces([
            Piece::new(PieceTag::new('A', 1), (0, 1), &unit),
            Piece::new(PieceTag::new('B', 1), (3, 1), &vertical),
            Piece::new(PieceTag::new('D', 1), (0, 0), &unit),
            Piece::new(PieceTag::new('D', 2), (1, 2), &unit),
        ])
}

fn blocked() -> Grid {
    let unit = PieceShape::rectangle(1, 1);

    Grid::new(2, 2).with_pieces([
        Piece::new(PieceTag::new('A', 1), (0, 0), &unit),
        Piece::new(PieceTag::new('D', 1), (1, 0), &unit),
        Piece::new(PieceTag::new('D', 2), (0, 1), &unit),
        Piece::new(PieceTag::new('D', 3), (1, 1), &unit),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Goal;

    #[test]
    fn test_catalog_grids_are_valid() {
        for puzzle in PUZZLES {
            let grid = puzzle.initial_grid();
            assert!(grid.is_valid(), "{} should start legal", puzzle.name);
            assert!(
                grid.piece(puzzle.target.0).is_some(),
                "{} should contain its target piece",
                puzzle.name
            );
            assert!(
                !puzzle.goal().is_reached(&grid),
                "{} should not start solved",
                puzzle.name
            );
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("classic").unwrap().name, "classic");
        assert!(matches!(find("nope"), Err(Error::UnknownPuzzle(_))));
    }

    #[test]
    fn test_classic_shares_shapes() {
        let grid = CLASSIC.initial_grid();
        let pieces = grid.pieces();
        assert!(pieces[1].shape.shares(&pieces[4].shape), "B pieces share a shape");
        assert!(pieces[6].shape.shares(&pieces[9].shape), "D pieces share a shape");
        assert!(!pieces[1].shape.shares(&pieces[6].shape));
    }

    #[test]
    fn test_classic_display() {
        insta::assert_snapshot!(CLASSIC.initial_grid().to_string(), @r"
        |  B1  A1  A1  B2
        |  B1  A1  A1  B2
        |  B3  C1  C1  B4
        |  B3  D2  D3  B4
        |  D1  **  **  D4
        ");
    }
}
