//! Breadth-first puzzle solver.
//!
//! Expands one level of the search forest at a time, trying every piece in
//! every direction from every state of the level. The first accepted state
//! that reaches the goal ends the search, which makes the returned path
//! move-count minimal.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::forest::{ForestStats, SearchForest};
use crate::geometry::Direction;
use crate::grid::{Grid, GridKey, Move, Symmetry};
use crate::Goal;

/// Parent linkage of one accepted state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchEdge {
    pub parent_index: usize,
    pub mv: Move,
}

/// The root has no edge.
type KlotskiForest = SearchForest<Grid, Option<SearchEdge>, GridKey>;

/// A goal grid together with the moves reaching it from the initial grid.
#[derive(Clone, Debug)]
pub struct Solution {
    pub grid: Grid,
    /// Oldest move first.
    pub path: Vec<Move>,
    /// Forest sizes at the moment the goal was found.
    pub stats: ForestStats,
}

/// Finds a shortest move sequence from `initial` to a grid satisfying `goal`.
///
/// States are deduplicated by their canonical key under `symmetry`.
///
/// # Errors
///
/// - [`Error::InvalidState`] if `initial` is not a legal grid.
/// - [`Error::Exhausted`] if every reachable state was explored without
///   reaching the goal.
pub fn solve<G: Goal>(initial: &Grid, goal: G, symmetry: Symmetry) -> Result<Solution> {
    let cells = initial.validate().ok_or(Error::InvalidState)?;

    if goal.is_reached(initial) {
        info!("initial grid already satisfies the goal");
        return Ok(Solution {
            grid: initial.clone(),
            path: Vec::new(),
            stats: ForestStats::default(),
        });
    }

    let mut forest = KlotskiForest::new();
    forest.append(initial.clone(), None, cells.key(symmetry));

    let piece_count = initial.pieces().len();

    loop {
        let level = match forest.increment_depth() {
            Ok(level) => level,
            Err(err) => {
                info!(
                    "search exhausted after {} states without reaching the goal",
                    forest.len()
                );
                return Err(err);
            }
        };
        debug!(
            "level {}: expanding states {}..{} ({:?})",
            forest.depth(),
            level.start,
            level.end,
            forest.stats()
        );

        for parent_index in level {
            for piece_index in 0..piece_count {
                for direction in Direction::ALL {
                    let mv = Move::new(piece_index, direction);
                    let grid = forest.state_at(parent_index)?.applied(mv)?;

                    let Some(cells) = grid.validate() else {
                        continue;
                    };

                    let edge = SearchEdge { parent_index, mv };
                    if !forest.append(grid, Some(edge), cells.key(symmetry)) {
                        continue;
                    }

                    let grid = forest.state_at(forest.last_index()?)?;
                    if goal.is_reached(grid) {
                        let grid = grid.clone();
                        let path = reconstruct_path(&forest)?;
                        let stats = forest.stats();
                        info!(
                            "solution found: {} moves, {} states explored",
                            path.len(),
                            stats.keys
                        );
                        return Ok(Solution { grid, path, stats });
                    }
                }
            }
        }
    }
}

/// Walks edges from the last appended state back to the root.
fn reconstruct_path(forest: &KlotskiForest) -> Result<Vec<Move>> {
    let mut path = Vec::new();
    let mut edge = *forest.edge_at(forest.last_index()?)?;

    while let Some(SearchEdge { parent_index, mv }) = edge {
        path.push(mv);
        edge = *forest.edge_at(parent_index)?;
    }

    path.reverse();
    Ok(path)
}

/// Applies `path` to `initial` step by step, returning every intermediate grid.
///
/// The first frame is `initial` itself, so the result holds `path.len() + 1`
/// grids.
///
/// # Errors
///
/// - [`Error::InvalidState`] if `initial` is not legal.
/// - [`Error::PieceIndex`] if a move addresses a missing piece.
/// - [`Error::IllegalMove`] with the zero-based move number if a move produces
///   an illegal grid.
pub fn replay(initial: &Grid, path: &[Move]) -> Result<Vec<Grid>> {
    if !initial.is_valid() {
        return Err(Error::InvalidState);
    }

    let mut frames = Vec::with_capacity(path.len() + 1);
    frames.push(initial.clone());

    for (step, &mv) in path.iter().enumerate() {
        let next = frames[step].applied(mv)?;
        if !next.is_valid() {
            return Err(Error::IllegalMove { step });
        }
        frames.push(next);
    }

    Ok(frames)
}
