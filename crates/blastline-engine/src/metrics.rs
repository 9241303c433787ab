//! Per-application metrics for the timeline engine.
//!
//! [`ReplayMetrics`] captures what the most recent batch application or
//! scrub did: how many records were merged, how many were malformed or
//! skipped, and how long it took.

use serde::{Deserialize, Serialize};

/// Counters collected during one merge pass.
///
/// The engine replaces its metrics after every `apply_batch`,
/// `select_index`, and `clear`; consumers read them from the most recent
/// operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayMetrics {
    /// Wall-clock time for the operation, in microseconds.
    pub elapsed_us: u64,
    /// Records fed through the reducers.
    pub records_applied: u64,
    /// Cells whose records were reduced.
    pub cells_touched: u64,
    /// Incoming records that carried no sequence index.
    pub missing_index: u64,
    /// Attribute edits skipped because their cell had no tile id.
    pub orphan_edits: u64,
    /// Whether derived state was rebuilt from an empty grid.
    pub full_replay: bool,
}
