//! Level-indexed, append-only store of visited search states.
//!
//! States and edges share one index space in insertion order. The key set is
//! the only authority on whether a state was seen before. Once a level is
//! closed, state payloads of every earlier level are dropped while edges are
//! kept for the whole run, so memory holds one level of states plus one
//! (small) edge and key per visited state.

use std::collections::VecDeque;
use std::hash::Hash;
use std::ops::Range;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Half-open range `[start, end)` of forest indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

impl IntoIterator for IndexRange {
    type Item = usize;
    type IntoIter = Range<usize>;

    fn into_iter(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Sizes of the forest's internal logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForestStats {
    /// Distinct keys seen, equal to the number of accepted states.
    pub keys: usize,
    pub edges: usize,
    /// State payloads still held in memory.
    pub nodes: usize,
    /// Closed breadth-first levels.
    pub levels: usize,
}

/// Append-only search forest, generic over state `S`, edge `E` and key `K`.
#[derive(Debug)]
pub struct SearchForest<S, E, K> {
    nodes: VecDeque<S>,
    edges: Vec<E>,
    levels: Vec<IndexRange>,
    keys: FxHashSet<K>,
}

impl<S, E, K: Hash + Eq> Default for SearchForest<S, E, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E, K: Hash + Eq> SearchForest<S, E, K> {
    pub fn new() -> Self {
        Self {
            nodes: VecDeque::new(),
            edges: Vec::new(),
            levels: Vec::new(),
            keys: FxHashSet::default(),
        }
    }

    /// Inserts a state unless its key was seen before.
    ///
    /// Returns false and changes nothing for a duplicate key.
    pub fn append(&mut self, state: S, edge: E, key: K) -> bool {
        if !self.keys.insert(key) {
            return false;
        }
        self.nodes.push_back(state);
        self.edges.push(edge);
        true
    }

    /// Closes the current level: everything appended since the previous call
    /// becomes the new level and all older state payloads are dropped.
    ///
    /// Fails with [`Error::Exhausted`] when nothing was appended since the
    /// previous call.
    pub fn increment_depth(&mut self) -> Result<IndexRange> {
        let start = self.levels.last().map_or(0, |level| level.end);
        let end = self.edges.len();
        let level = IndexRange::new(start, end);

        if level.is_empty() {
            return Err(Error::Exhausted {
                depth: self.levels.len(),
            });
        }

        self.levels.push(level);

        // nodes hold every payload from the previous level's start onward;
        // keep only the tail belonging to the new level
        let stale = self.nodes.len() - level.len();
        self.nodes.drain(..stale);

        Ok(level)
    }

    /// The most recently closed level, `[0, 0)` before the first one.
    pub fn current_level(&self) -> IndexRange {
        self.levels.last().copied().unwrap_or_default()
    }

    /// Number of closed levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// State payload at `index`.
    ///
    /// Fails with [`Error::OptimizedOut`] for indices before the current level,
    /// whose payloads were dropped.
    pub fn state_at(&self, index: usize) -> Result<&S> {
        let first = self.current_level().start;
        if index < first {
            return Err(Error::OptimizedOut { index, first });
        }
        self.nodes.get(index - first).ok_or(Error::IndexOutOfRange {
            index,
            len: self.edges.len(),
        })
    }

    /// Edge at `index`. Edges are never dropped.
    pub fn edge_at(&self, index: usize) -> Result<&E> {
        self.edges.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.edges.len(),
        })
    }

    /// Index of the most recently appended entry.
    pub fn last_index(&self) -> Result<usize> {
        self.edges.len().checked_sub(1).ok_or(Error::EmptyForest)
    }

    /// Total number of entries ever appended.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn stats(&self) -> ForestStats {
        ForestStats {
            keys: self.keys.len(),
            edges: self.edges.len(),
            nodes: self.nodes.len(),
            levels: self.levels.len(),
        }
    }
}
