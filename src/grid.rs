//! Board configurations, legality checking and canonical keys.
//!
//! A [`Grid`] stores only piece anchors. Occupancy is rebuilt from scratch by
//! [`Grid::validate`] every time it is needed, so all bounds and collision
//! logic lives in one place.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::{Direction, Position};
use crate::pieces::{Piece, PieceShape, PieceTag};

/// Deduplication key of a validated grid.
pub type GridKey = String;

/// One unit displacement of one piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// Index into the grid's piece sequence.
    pub piece_index: usize,
    pub direction: Direction,
}

impl Move {
    pub const fn new(piece_index: usize, direction: Direction) -> Self {
        Self {
            piece_index,
            direction,
        }
    }

    /// Human-readable form, e.g. `A1↓`, naming the piece as it appears in `grid`.
    pub fn notation(&self, grid: &Grid) -> Result<String> {
        let piece = grid.piece_at(self.piece_index)?;
        Ok(format!("{}{}", piece.tag, self.direction.symbol()))
    }
}

/// Formats a whole move list in notation, separated by spaces.
pub fn format_moves(grid: &Grid, moves: &[Move]) -> Result<String> {
    let names = moves
        .iter()
        .map(|mv| mv.notation(grid))
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(" "))
}

/// One full board configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    pieces: Vec<Piece>,
    /// Absolute obstacle cells, shared by every copy of this grid.
    obstacles: PieceShape,
}

impl Grid {
    /// Creates an empty board with no pieces and no obstacles.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            pieces: Vec::new(),
            obstacles: PieceShape::new(&[]),
        }
    }

    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.pieces.push(piece);
        self
    }

    pub fn with_pieces(mut self, pieces: impl IntoIterator<Item = Piece>) -> Self {
        self.pieces.extend(pieces);
        self
    }

    pub fn with_obstacles(mut self, cells: &[Position]) -> Self {
        self.obstacles = PieceShape::new(cells);
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_at(&self, index: usize) -> Result<&Piece> {
        self.pieces.get(index).ok_or(Error::PieceIndex {
            index,
            count: self.pieces.len(),
        })
    }

    /// Finds a piece by identity.
    pub fn piece(&self, tag: PieceTag) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.tag == tag)
    }

    /// Index of the piece with the given identity.
    pub fn piece_index(&self, tag: PieceTag) -> Option<usize> {
        self.pieces.iter().position(|piece| piece.tag == tag)
    }

    /// Moves the addressed piece by one cell. Legality is not checked here.
    pub fn apply(&mut self, mv: Move) -> Result<()> {
        let count = self.pieces.len();
        let piece = self.pieces.get_mut(mv.piece_index).ok_or(Error::PieceIndex {
            index: mv.piece_index,
            count,
        })?;
        piece.position += mv.direction.vector();
        Ok(())
    }

    /// Returns a copy of this grid with `mv` applied.
    pub fn applied(&self, mv: Move) -> Result<Grid> {
        let mut next = self.clone();
        next.apply(mv)?;
        Ok(next)
    }

    /// Builds the occupancy map, or `None` if any cell is out of bounds or
    /// occupied twice. Obstacles are stamped before pieces.
    ///
    /// Pieces tagged with a reserved cell marker are rejected: they would be
    /// indistinguishable from free or obstacle cells.
    pub fn validate(&self) -> Option<Cells> {
        if self.pieces.iter().any(|piece| piece.tag.is_reserved()) {
            return None;
        }

        let mut cells = Cells::empty(self.width, self.height);

        for &obstacle in self.obstacles.offsets() {
            if !cells.stamp(obstacle, PieceTag::OBSTACLE) {
                return None;
            }
        }

        for piece in &self.pieces {
            for position in piece.cells() {
                if !cells.stamp(position, piece.tag) {
                    return None;
                }
            }
        }

        Some(cells)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_some()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.validate() {
            Some(cells) => fmt::Display::fmt(&cells, f),
            None => f.write_str("| INVALID"),
        }
    }
}

/// Computes the canonical key of a grid, or `None` if the grid is illegal.
#[inline]
pub fn canonical_key(grid: &Grid, symmetry: Symmetry) -> Option<GridKey> {
    grid.validate().map(|cells| cells.key(symmetry))
}

/// Which board symmetries are folded together when computing keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Every distinct layout is its own state.
    None,
    /// A layout and its left-right mirror image are the same state.
    #[default]
    Horizontal,
}

impl FromStr for Symmetry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "no-symmetry" => Ok(Symmetry::None),
            "horizontal" | "horizontal-symmetry" => Ok(Symmetry::Horizontal),
            _ => Err(Error::UnsupportedSymmetry(s.to_string())),
        }
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symmetry::None => f.write_str("none"),
            Symmetry::Horizontal => f.write_str("horizontal"),
        }
    }
}

/// Dense per-cell contents of a validated grid, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cells {
    width: i32,
    height: i32,
    tags: Vec<PieceTag>,
}

impl Cells {
    fn empty(width: i32, height: i32) -> Self {
        let count = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            tags: vec![PieceTag::EMPTY; count],
        }
    }

    #[inline(always)]
    fn contains(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    /// Converts an in-bounds position to a linear row-major index.
    #[inline(always)]
    fn index(&self, position: Position) -> usize {
        position.y as usize * self.width as usize + position.x as usize
    }

    /// Writes `tag` into a free in-bounds cell. Returns false on a collision
    /// or an out-of-bounds position.
    #[inline]
    fn stamp(&mut self, position: Position, tag: PieceTag) -> bool {
        if !self.contains(position) {
            return false;
        }
        let index = self.index(position);
        if self.tags[index] != PieceTag::EMPTY {
            return false;
        }
        self.tags[index] = tag;
        true
    }

    /// Contents of a cell, or `None` outside the board.
    pub fn get(&self, position: Position) -> Option<PieceTag> {
        self.contains(position)
            .then(|| self.tags[self.index(position)])
    }


    /// Deduplication key under the given symmetry.
    ///
    /// Only piece symbols are used, never instance numbers, so same-shaped
    /// pieces are interchangeable.
    pub fn key(&self, symmetry: Symmetry) -> GridKey {
        match symmetry {
            Symmetry::None => self.row_major_key(),
            Symmetry::Horizontal => {
                let direct = self.row_major_key();
                let mirrored = self.mirrored_key();
                direct.min(mirrored)
            }
        }
    }

    fn row_major_key(&self) -> GridKey {
        self.tags.iter().map(|tag| tag.symbol).collect()
    }

    /// Row-major key of the board reflected left-right (x -> width - 1 - x).
    fn mirrored_key(&self) -> GridKey {
        let width = self.width as usize;
        let mut key = String::with_capacity(self.tags.len());
        for row in self.tags.chunks(width.max(1)) {
            key.extend(row.iter().rev().map(|tag| tag.symbol));
        }
        key
    }
}

impl fmt::Display for Cells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.width.max(1) as usize;
        for (y, row) in self.tags.chunks(width).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            f.write_str("|")?;
            for tag in row {
                write!(f, "  {tag}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(symbol: char, number: u32) -> PieceTag {
        PieceTag::new(symbol, number)
    }

    /// 3x2 board: a 2x1 bar on the top-left and a single cell on the bottom-right.
    fn small_grid() -> Grid {
        let bar = PieceShape::rectangle(2, 1);
        let unit = PieceShape::rectangle(1, 1);
        Grid::new(3, 2)
            .with_piece(Piece::new(tag('C', 1), (0, 0), &bar))
            .with_piece(Piece::new(tag('D', 1), (2, 1), &unit))
    }

    #[test]
    fn test_validate_accepts_disjoint_pieces() {
        let cells = small_grid().validate().expect("grid should be valid");
        assert_eq!(cells.get(Position::new(0, 0)), Some(tag('C', 1)));
        assert_eq!(cells.get(Position::new(1, 0)), Some(tag('C', 1)));
        assert_eq!(cells.get(Position::new(2, 0)), Some(PieceTag::EMPTY));
        assert_eq!(cells.get(Position::new(2, 1)), Some(tag('D', 1)));
        assert_eq!(cells.get(Position::new(3, 1)), None);
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let mut grid = small_grid();
        grid.apply(Move::new(0, Direction::Up)).unwrap();
        assert!(grid.validate().is_none(), "bar above the board should be invalid");

        let mut grid = small_grid();
        grid.apply(Move::new(1, Direction::Right)).unwrap();
        assert!(!grid.is_valid(), "cell right of the board should be invalid");
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let unit = PieceShape::rectangle(1, 1);
        let grid = small_grid().with_piece(Piece::new(tag('D', 2), (1, 0), &unit));
        assert!(!grid.is_valid(), "D2 sits on top of the bar");
    }

    #[test]
    fn test_validate_rejects_reserved_tags() {
        let unit = PieceShape::rectangle(1, 1);

        // an "empty" piece would leave its cell looking free
        let hidden = Grid::new(2, 1)
            .with_piece(Piece::new(PieceTag::EMPTY, (0, 0), &unit))
            .with_piece(Piece::new(tag('A', 1), (0, 0), &unit));
        assert!(!hidden.is_valid(), "A1 lands on a piece tagged as empty");

        let alone = Grid::new(2, 1).with_piece(Piece::new(tag('*', 1), (0, 0), &unit));
        assert!(!alone.is_valid());
        assert_eq!(canonical_key(&alone, Symmetry::None), None);

        let walled = Grid::new(2, 1).with_piece(Piece::new(tag('#', 1), (1, 0), &unit));
        assert_eq!(canonical_key(&walled, Symmetry::None), None);
    }

    #[test]
    fn test_keys_differ_when_a_piece_moves() {
        let unit = PieceShape::rectangle(1, 1);
        let left = Grid::new(2, 1).with_piece(Piece::new(tag('D', 1), (0, 0), &unit));
        let right = left.applied(Move::new(0, Direction::Right)).unwrap();
        assert_ne!(
            canonical_key(&left, Symmetry::None),
            canonical_key(&right, Symmetry::None)
        );
    }

    #[test]
    fn test_cell_index_past_i32_range() {
        // row offset alone exceeds i32::MAX; no tags are allocated
        let cells = Cells {
            width: 46_341,
            height: 46_342,
            tags: Vec::new(),
        };
        assert_eq!(cells.index(Position::new(2, 46_341)), 2_147_488_283);

        assert!(Cells::empty(-3, 2).tags.is_empty(), "negative width means no cells");

        let unit = PieceShape::rectangle(1, 1);
        let tall = Grid::new(1, 70_000).with_piece(Piece::new(tag('D', 1), (0, 69_999), &unit));
        let cells = tall.validate().expect("piece on the last row");
        assert_eq!(cells.get(Position::new(0, 69_999)), Some(tag('D', 1)));
    }

    #[test]
    fn test_validate_rejects_bad_obstacles() {
        let outside = small_grid().with_obstacles(&[Position::new(-1, 0)]);
        assert!(!outside.is_valid(), "obstacle outside the board");

        let doubled = Grid::new(2, 2).with_obstacles(&[Position::new(0, 0), Position::new(0, 0)]);
        assert!(!doubled.is_valid(), "obstacle stamped twice");

        let covered = small_grid().with_obstacles(&[Position::new(2, 1)]);
        assert!(!covered.is_valid(), "piece on top of an obstacle");

        let fine = small_grid().with_obstacles(&[Position::new(0, 1)]);
        let cells = fine.validate().expect("obstacle on a free cell");
        assert_eq!(cells.get(Position::new(0, 1)), Some(PieceTag::OBSTACLE));
    }

    #[test]
    fn test_apply_moves_only_addressed_piece() {
        let grid = small_grid();
        let moved = grid.applied(Move::new(1, Direction::Left)).unwrap();
        assert_eq!(moved.pieces()[0], grid.pieces()[0]);
        assert_eq!(moved.pieces()[1].position, Position::new(1, 1));
        assert_eq!(grid.pieces()[1].position, Position::new(2, 1), "original untouched");
    }

    #[test]
    fn test_apply_rejects_missing_piece() {
        let mut grid = small_grid();
        let err = grid.apply(Move::new(2, Direction::Up)).unwrap_err();
        assert!(matches!(err, Error::PieceIndex { index: 2, count: 2 }));
    }

    #[test]
    fn test_key_ignores_instance_numbers() {
        let unit = PieceShape::rectangle(1, 1);
        let a = Grid::new(3, 1)
            .with_piece(Piece::new(tag('D', 1), (0, 0), &unit))
            .with_piece(Piece::new(tag('D', 2), (2, 0), &unit));
        let b = Grid::new(3, 1)
            .with_piece(Piece::new(tag('D', 2), (0, 0), &unit))
            .with_piece(Piece::new(tag('D', 1), (2, 0), &unit));
        assert_eq!(
            canonical_key(&a, Symmetry::None),
            canonical_key(&b, Symmetry::None)
        );
        assert_eq!(canonical_key(&a, Symmetry::None).unwrap(), "D*D");
    }

    #[test]
    fn test_key_row_major_with_obstacles() {
        let grid = small_grid().with_obstacles(&[Position::new(0, 1)]);
        assert_eq!(canonical_key(&grid, Symmetry::None).unwrap(), "CC*#*D");
    }

    #[test]
    fn test_horizontal_key_folds_mirror_images() {
        let grid = small_grid();
        let mirrored = small_grid()
            .applied(Move::new(0, Direction::Right))
            .unwrap()
            .applied(Move::new(1, Direction::Left))
            .unwrap()
            .applied(Move::new(1, Direction::Left))
            .unwrap();

        assert_ne!(
            canonical_key(&grid, Symmetry::None),
            canonical_key(&mirrored, Symmetry::None)
        );
        assert_eq!(
            canonical_key(&grid, Symmetry::Horizontal),
            canonical_key(&mirrored, Symmetry::Horizontal)
        );
        // "*CCD**" < "CC***D"
        assert_eq!(canonical_key(&grid, Symmetry::Horizontal).unwrap(), "*CCD**");
    }

    #[test]
    fn test_symmetry_parsing() {
        assert_eq!("none".parse::<Symmetry>().unwrap(), Symmetry::None);
        assert_eq!("Horizontal".parse::<Symmetry>().unwrap(), Symmetry::Horizontal);
        let err = "vertical".parse::<Symmetry>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSymmetry(ref mode) if mode == "vertical"));
    }

    #[test]
    fn test_display() {
        let grid = small_grid().with_obstacles(&[Position::new(0, 1)]);
        insta::assert_snapshot!(grid.to_string(), @r"
        |  C1  C1  **
        |  ##  **  D1
        ");
    }

    #[test]
    fn test_display_invalid() {
        let grid = small_grid().applied(Move::new(0, Direction::Left)).unwrap();
        assert_eq!(grid.to_string(), "| INVALID");
    }

    #[test]
    fn test_move_notation() {
        let grid = small_grid();
        let moves = [Move::new(1, Direction::Up), Move::new(0, Direction::Right)];
        assert_eq!(format_moves(&grid, &moves).unwrap(), "D1↑ C1→");
        assert!(Move::new(5, Direction::Up).notation(&grid).is_err());
    }
}
