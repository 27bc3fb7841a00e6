//! Piece shapes, identities and placed piece instances.
//!
//! A shape is built once at puzzle setup and shared by every piece using it,
//! so copying a grid during search never copies footprints.

use std::fmt;
use std::rc::Rc;

use crate::geometry::Position;

/// Immutable footprint template: cell offsets relative to a piece anchor.
///
/// Cloning is cheap and keeps pointing at the same offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceShape(Rc<[Position]>);

impl PieceShape {
    pub fn new(offsets: &[Position]) -> Self {
        Self(offsets.into())
    }

    /// Builds a filled `width` x `height` rectangle anchored at its top-left cell.
    pub fn rectangle(width: i32, height: i32) -> Self {
        let offsets: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .collect();
        Self(offsets.into())
    }

    #[inline]
    pub fn offsets(&self) -> &[Position] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether both handles refer to the same shared template.
    pub fn shares(&self, other: &PieceShape) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Identity of one piece instance.
///
/// Pieces of the same shape share a `symbol` and differ by `number`. Only the
/// symbol enters the dedup key, so swapping two same-shaped pieces yields the
/// same search state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceTag {
    pub symbol: char,
    pub number: u32,
}

impl PieceTag {
    /// Marks a free cell in an occupancy map.
    pub const EMPTY: PieceTag = PieceTag::new('*', 0);
    /// Marks a fixed obstacle cell in an occupancy map.
    pub const OBSTACLE: PieceTag = PieceTag::new('#', 0);

    pub const fn new(symbol: char, number: u32) -> Self {
        Self { symbol, number }
    }

    /// Whether the symbol is one of the cell markers, which no piece may use.
    pub const fn is_reserved(&self) -> bool {
        self.symbol == PieceTag::EMPTY.symbol || self.symbol == PieceTag::OBSTACLE.symbol
    }
}

impl fmt::Display for PieceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol == PieceTag::EMPTY.symbol {
            f.write_str("**")
        } else if self.symbol == PieceTag::OBSTACLE.symbol {
            f.write_str("##")
        } else {
            write!(f, "{}{}", self.symbol, self.number)
        }
    }
}

/// One piece on the board. Only `position` changes, and only by applying a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub tag: PieceTag,
    pub position: Position,
    pub shape: PieceShape,
}

impl Piece {
    pub fn new(tag: PieceTag, position: impl Into<Position>, shape: &PieceShape) -> Self {
        Self {
            tag,
            position: position.into(),
            shape: shape.clone(),
        }
    }

    /// Absolute cells covered by this piece.
    #[inline]
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape
            .offsets()
            .iter()
            .map(move |&offset| self.position + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_offsets() {
        let shape = PieceShape::rectangle(2, 1);
        assert_eq!(
            shape.offsets(),
            &[Position::new(0, 0), Position::new(1, 0)],
            "2x1 rectangle should span one row"
        );
        assert_eq!(PieceShape::rectangle(2, 2).len(), 4);
    }

    #[test]
    fn test_shape_is_shared_between_pieces() {
        let shape = PieceShape::rectangle(1, 2);
        let first = Piece::new(PieceTag::new('B', 1), (0, 0), &shape);
        let second = Piece::new(PieceTag::new('B', 2), (3, 0), &shape);
        assert!(first.shape.shares(&second.shape));
        assert!(!first.shape.shares(&PieceShape::rectangle(1, 2)));
    }

    #[test]
    fn test_cells_follow_anchor() {
        let piece = Piece::new(PieceTag::new('A', 1), (1, 3), &PieceShape::rectangle(2, 2));
        let cells: Vec<Position> = piece.cells().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(1, 4),
                Position::new(2, 4)
            ]
        );
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(PieceTag::new('D', 3).to_string(), "D3");
        assert_eq!(PieceTag::EMPTY.to_string(), "**");
        assert_eq!(PieceTag::OBSTACLE.to_string(), "##");
    }

    #[test]
    fn test_reserved_symbols() {
        assert!(PieceTag::EMPTY.is_reserved());
        assert!(PieceTag::new('#', 3).is_reserved());
        assert!(!PieceTag::new('A', 1).is_reserved());
    }
}
