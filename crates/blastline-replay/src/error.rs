//! Error types for replay verification.

use blastline_core::SequenceIndex;

/// Errors from checking a timeline against recorded checkpoints.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// A replayed view hashed differently from its checkpoint.
    #[error("index {index} diverged: recorded {recorded:#018x}, replayed {replayed:#018x}")]
    HashMismatch {
        /// Cursor position of the checkpoint.
        index: SequenceIndex,
        /// Hash stored in the checkpoint.
        recorded: u64,
        /// Hash of the replayed view.
        replayed: u64,
    },
    /// A checkpoint lies past the end of the timeline being verified.
    #[error("checkpoint at index {index} lies past the timeline end {max_index}")]
    BeyondTimeline {
        /// Cursor position of the checkpoint.
        index: SequenceIndex,
        /// Largest index the timeline holds.
        max_index: SequenceIndex,
    },
}
