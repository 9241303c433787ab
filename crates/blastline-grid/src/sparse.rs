//! Sparse 2D storage keyed by integer position.
//!
//! [`SparseGrid`] stores only cells that were written. Iteration order
//! is insertion order, which keeps replays and generator output
//! deterministic without sorting on every read.

use blastline_core::Position;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// A map from `(x, y)` to `T` with monotonically growing bounds.
///
/// There is no removal: a grid is reset by replacing it with a new one.
/// Every stored key lies within [`bounds`](Self::bounds).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct SparseGrid<T> {
    #[serde(with = "indexmap::map::serde_seq")]
    cells: IndexMap<Position, T>,
    bounds: Bounds,
}

impl<T> Default for SparseGrid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseGrid<T> {
    /// An empty grid with bounds `(0, 0)..=(0, 0)`.
    pub fn new() -> Self {
        Self {
            cells: IndexMap::new(),
            bounds: Bounds::default(),
        }
    }

    /// Value at `(x, y)`, if stored.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.cells.get(&Position::new(x, y))
    }

    /// Value at `pos`, if stored.
    pub fn get_at(&self, pos: Position) -> Option<&T> {
        self.cells.get(&pos)
    }

    /// Mutable value at `(x, y)`, if stored.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.cells.get_mut(&Position::new(x, y))
    }

    /// Store `value` at `(x, y)`, widening bounds. Returns the previous value.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> Option<T> {
        self.set_at(Position::new(x, y), value)
    }

    /// Store `value` at `pos`, widening bounds. Returns the previous value.
    pub fn set_at(&mut self, pos: Position, value: T) -> Option<T> {
        self.bounds.include(pos);
        self.cells.insert(pos, value)
    }

    /// Mutable value at `pos`, inserting `make()` first if absent.
    pub fn get_or_insert_with(&mut self, pos: Position, make: impl FnOnce() -> T) -> &mut T {
        self.bounds.include(pos);
        match self.cells.entry(pos) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(make()),
        }
    }

    /// Whether `(x, y)` holds a value.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cells.contains_key(&Position::new(x, y))
    }

    /// Whether `pos` holds a value.
    pub fn contains_at(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is stored.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Stored cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.cells.iter().map(|(p, v)| (*p, v))
    }

    /// Stored positions in insertion order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.keys().copied()
    }

    /// Current bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Bounds covering both this grid and `other`.
    pub fn union_bounds<U>(&self, other: &SparseGrid<U>) -> Bounds {
        self.bounds.union(&other.bounds)
    }

    /// Widen this grid's bounds to cover `bounds` without storing anything.
    pub fn extend_bounds(&mut self, bounds: Bounds) {
        self.bounds = self.bounds.union(&bounds);
    }
}

impl<T> FromIterator<(Position, T)> for SparseGrid<T> {
    fn from_iter<I: IntoIterator<Item = (Position, T)>>(iter: I) -> Self {
        let mut grid = SparseGrid::new();
        for (pos, value) in iter {
            grid.set_at(pos, value);
        }
        grid
    }
}

impl<T> IntoIterator for SparseGrid<T> {
    type Item = (Position, T);
    type IntoIter = indexmap::map::IntoIter<Position, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
