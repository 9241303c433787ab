//! Session-scoped sequence index allocation.

use serde::{Deserialize, Serialize};

use crate::id::SequenceIndex;

/// Monotonic allocator for [`SequenceIndex`] values.
///
/// One allocator is shared by every generator run within a session so
/// that indices are globally unique. It is reset only when the session
/// is torn down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceAllocator {
    next: u64,
}

impl SequenceAllocator {
    /// An allocator starting at index 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose first index is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Allocate the next index.
    pub fn allocate(&mut self) -> SequenceIndex {
        let index = SequenceIndex(self.next);
        self.next += 1;
        index
    }

    /// The index the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> SequenceIndex {
        SequenceIndex(self.next)
    }

    /// Ensure future indices are strictly greater than `seen`.
    pub fn advance_past(&mut self, seen: SequenceIndex) {
        self.next = self.next.max(seen.0 + 1);
    }

    /// Restart at index 0.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}
