//! View comparison and replay verification.
//!
//! Provides hash-first comparison (fast path) with a per-cell fallback on
//! mismatch, plus checkpoint recording and verification for checking
//! that two sessions fed the same generator runs derive the same state.

use std::collections::BTreeSet;

use blastline_core::{Position, SequenceIndex, TileCell};
use blastline_engine::{BookmarkKind, TimelineEngine, TimelineView};
use serde::{Deserialize, Serialize};

use crate::error::ReplayError;
use crate::hash::view_hash;

/// One difference between a recorded and a replayed view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Divergence {
    /// The cursors differ.
    Cursor {
        /// Recorded cursor.
        recorded: SequenceIndex,
        /// Replayed cursor.
        replayed: SequenceIndex,
    },
    /// A tile cell differs or exists on one side only.
    Tile {
        /// The cell.
        pos: Position,
        /// Recorded value.
        recorded: Option<TileCell>,
        /// Replayed value.
        replayed: Option<TileCell>,
    },
    /// A heat count differs or exists on one side only.
    Heat {
        /// The cell.
        pos: Position,
        /// Recorded count.
        recorded: Option<u32>,
        /// Replayed count.
        replayed: Option<u32>,
    },
    /// The path lists differ in length.
    PathCount {
        /// Recorded length.
        recorded: usize,
        /// Replayed length.
        replayed: usize,
    },
    /// The first differing entry of equally long path lists.
    Path {
        /// Offset into the path list.
        offset: usize,
    },
}

/// Every divergence found between two views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DivergenceReport {
    /// Cursor of the recorded view.
    pub index: SequenceIndex,
    /// Differences, cursor first, then tiles and heat in position order,
    /// then paths.
    pub divergences: Vec<Divergence>,
}

/// Hash of the view at one cursor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Cursor position.
    pub index: SequenceIndex,
    /// [`view_hash`] of the view there.
    pub hash: u64,
}

/// Compare two views.
///
/// Fast path: hash both and return `None` on a match. On a mismatch,
/// walk every cell and path to report exactly what differs.
pub fn compare_views(recorded: &TimelineView, replayed: &TimelineView) -> Option<DivergenceReport> {
    if view_hash(recorded) == view_hash(replayed) {
        return None;
    }

    let mut divergences = Vec::new();
    if recorded.current_index != replayed.current_index {
        divergences.push(Divergence::Cursor {
            recorded: recorded.current_index,
            replayed: replayed.current_index,
        });
    }

    let cells: BTreeSet<Position> = recorded
        .tiles
        .positions()
        .chain(replayed.tiles.positions())
        .collect();
    for pos in cells {
        let (a, b) = (recorded.tiles.get_at(pos), replayed.tiles.get_at(pos));
        if a != b {
            divergences.push(Divergence::Tile {
                pos,
                recorded: a.cloned(),
                replayed: b.cloned(),
            });
        }
    }

    let cells: BTreeSet<Position> = recorded
        .heat
        .positions()
        .chain(replayed.heat.positions())
        .collect();
    for pos in cells {
        let (a, b) = (recorded.heat.get_at(pos), replayed.heat.get_at(pos));
        if a != b {
            divergences.push(Divergence::Heat {
                pos,
                recorded: a.copied(),
                replayed: b.copied(),
            });
        }
    }

    if recorded.paths.len() != replayed.paths.len() {
        divergences.push(Divergence::PathCount {
            recorded: recorded.paths.len(),
            replayed: replayed.paths.len(),
        });
    } else if let Some(offset) = recorded
        .paths
        .iter()
        .zip(&replayed.paths)
        .position(|(a, b)| a != b)
    {
        divergences.push(Divergence::Path { offset });
    }

    Some(DivergenceReport {
        index: recorded.current_index,
        divergences,
    })
}

/// Hash the engine's state at the end of every generator run and at the
/// head of the timeline, without moving its cursor.
pub fn record_checkpoints(engine: &TimelineEngine) -> Vec<Checkpoint> {
    let mut indices: BTreeSet<SequenceIndex> = engine
        .bookmarks()
        .iter()
        .filter(|b| b.kind == BookmarkKind::Source)
        .map(|b| b.index)
        .collect();
    if !engine.entries().is_empty() {
        indices.insert(engine.max_index());
    }
    indices
        .into_iter()
        .filter_map(|index| {
            engine.replay_to(index, &|| false).map(|view| Checkpoint {
                index,
                hash: view_hash(&view),
            })
        })
        .collect()
}

/// Replay `engine` at every checkpoint and compare hashes.
///
/// Returns the first checkpoint that fails.
pub fn verify_checkpoints(
    engine: &TimelineEngine,
    checkpoints: &[Checkpoint],
) -> Result<(), ReplayError> {
    for checkpoint in checkpoints {
        if checkpoint.index > engine.max_index() {
            return Err(ReplayError::BeyondTimeline {
                index: checkpoint.index,
                max_index: engine.max_index(),
            });
        }
        let replayed = engine
            .replay_to(checkpoint.index, &|| false)
            .map(|view| view_hash(&view))
            .unwrap_or_default();
        if replayed != checkpoint.hash {
            return Err(ReplayError::HashMismatch {
                index: checkpoint.index,
                recorded: checkpoint.hash,
                replayed,
            });
        }
    }
    Ok(())
}
