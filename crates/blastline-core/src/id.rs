//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Global position of a record in the edit stream.
///
/// Allocated monotonically by a [`SequenceAllocator`](crate::SequenceAllocator)
/// and used as the only valid sort key when rebuilding state "as of" a
/// point in the timeline. Allocation order need not match the order in
/// which a generator appends records to its log.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceIndex(pub u64);

impl SequenceIndex {
    /// The index immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SequenceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SequenceIndex {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a tile type in a [`TileCatalog`](crate::TileCatalog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TileId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
