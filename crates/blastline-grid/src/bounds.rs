//! Inclusive rectangular bounds.

use blastline_core::Position;
use serde::{Deserialize, Serialize};

/// Inclusive axis-aligned rectangle `[start, end]`.
///
/// Bounds only ever grow. A fresh grid starts at `(0, 0)..=(0, 0)`,
/// so the origin is always inside the bounds even when no cell near
/// it was written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (inclusive).
    pub start: Position,
    /// Maximum corner (inclusive).
    pub end: Position,
}

impl Bounds {
    /// Bounds covering exactly one position.
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Widen to include `pos`.
    pub fn include(&mut self, pos: Position) {
        self.start.x = self.start.x.min(pos.x);
        self.start.y = self.start.y.min(pos.y);
        self.end.x = self.end.x.max(pos.x);
        self.end.y = self.end.y.max(pos.y);
    }

    /// Component-wise min of starts and max of ends.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.include(other.start);
        out.include(other.end);
        out
    }

    /// Whether `pos` lies inside the bounds.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.start.x && pos.x <= self.end.x && pos.y >= self.start.y && pos.y <= self.end.y
    }

    /// Number of columns covered.
    pub fn width(&self) -> u32 {
        self.end.x.abs_diff(self.start.x) + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> u32 {
        self.end.y.abs_diff(self.start.y) + 1
    }
}
