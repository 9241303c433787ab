//! Derived projections and the snapshot handed to readers.
//!
//! [`DerivedState`] holds the three projections the engine maintains
//! (tiles, paths, heat) and knows how to merge an [`EditLog`] into them.
//! [`TimelineView`] is an owned, cloneable snapshot of those projections
//! plus the timeline cursor, published by the scrub worker.

use blastline_core::{EditRecord, EditSource, PathData, SequenceIndex};
use blastline_grid::{EditLog, HeatGrid, TileGrid};
use serde::{Deserialize, Serialize};

use crate::bookmark::Bookmark;
use crate::config::EngineConfig;
use crate::merge::{accumulate, ordered, MergeReducer};
use crate::metrics::ReplayMetrics;

/// One entry of the derived path list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathTrace {
    /// The segment and its metadata.
    pub path: PathData,
    /// Index of the record that carried the segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<SequenceIndex>,
    /// Source of the record that carried the segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EditSource>,
}

impl PathTrace {
    /// Trace for `record`, if it carries a path.
    pub fn of(record: &EditRecord) -> Option<Self> {
        record.path.as_ref().map(|path| Self {
            path: path.clone(),
            sequence_index: record.sequence_index,
            source: record.source.clone(),
        })
    }
}

/// Tile, path, and heat projections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Merged tile values.
    pub tiles: TileGrid,
    /// Path segments ordered by sequence index.
    pub paths: Vec<PathTrace>,
    /// Path-carrying record count per cell.
    pub heat: HeatGrid,
}

impl DerivedState {
    /// Merge every cell of `log` into the projections.
    ///
    /// `cancelled` is polled once per cell; if it returns true the merge
    /// stops and `false` is returned, leaving the state partially merged.
    pub(crate) fn merge(
        &mut self,
        log: &EditLog,
        reducer: &MergeReducer,
        config: &EngineConfig,
        metrics: &mut ReplayMetrics,
        cancelled: &dyn Fn() -> bool,
    ) -> bool {
        self.tiles.extend_bounds(log.bounds());
        if config.track_heat {
            self.heat.extend_bounds(log.bounds());
        }

        for (pos, records) in log.iter_cells() {
            if cancelled() {
                return false;
            }
            metrics.cells_touched += 1;
            metrics.records_applied += records.len() as u64;

            let edits = ordered(records, EditRecord::has_tile_edit);
            if !edits.is_empty() {
                if let Some(cell) = reducer.reduce_tile(self.tiles.get_at(pos), &edits, metrics) {
                    self.tiles.set_at(pos, cell);
                }
            }

            if config.track_heat {
                let carriers = ordered(records, EditRecord::has_path);
                if !carriers.is_empty() {
                    let count = accumulate(self.heat.get_at(pos).copied(), &carriers);
                    self.heat.set_at(pos, count);
                }
            }
        }

        if config.collect_paths {
            self.paths.extend(log.records().filter_map(PathTrace::of));
            self.paths.sort_by_key(|p| p.sequence_index);
        }
        true
    }

    /// Rebuild projections from scratch over `log`.
    ///
    /// Returns `None` if `cancelled` fired before the merge finished.
    pub(crate) fn replay(
        log: &EditLog,
        reducer: &MergeReducer,
        config: &EngineConfig,
        metrics: &mut ReplayMetrics,
        cancelled: &dyn Fn() -> bool,
    ) -> Option<Self> {
        let mut state = Self::default();
        metrics.full_replay = true;
        state
            .merge(log, reducer, config, metrics, cancelled)
            .then_some(state)
    }
}

/// Owned snapshot of the engine's projections and cursor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineView {
    /// Merged tile values.
    pub tiles: TileGrid,
    /// Path segments ordered by sequence index.
    pub paths: Vec<PathTrace>,
    /// Path-carrying record count per cell.
    pub heat: HeatGrid,
    /// Source and phase bookmarks.
    pub bookmarks: Vec<Bookmark>,
    /// Cursor position.
    pub current_index: SequenceIndex,
    /// Largest applied index.
    pub max_index: SequenceIndex,
}

impl TimelineView {
    pub(crate) fn from_state(
        state: DerivedState,
        bookmarks: Vec<Bookmark>,
        current_index: SequenceIndex,
        max_index: SequenceIndex,
    ) -> Self {
        Self {
            tiles: state.tiles,
            paths: state.paths,
            heat: state.heat,
            bookmarks,
            current_index,
            max_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastline_core::{PointF, Position, TileCell, TileEdit, TileId};

    fn path_record(x: i32, index: u64) -> EditRecord {
        EditRecord::at(Position::new(x, 0))
            .index(index)
            .path(PathData::segment(PointF::new(0.0, 0.0), PointF::new(1.0, 0.0)))
    }

    #[test]
    fn paths_stay_sorted_across_merges() {
        let reducer = MergeReducer::default();
        let config = EngineConfig::default();
        let mut metrics = ReplayMetrics::default();
        let mut state = DerivedState::default();
        let first: EditLog = [path_record(0, 4), path_record(1, 1)].into_iter().collect();
        let second: EditLog = [path_record(0, 2)].into_iter().collect();
        assert!(state.merge(&first, &reducer, &config, &mut metrics, &|| false));
        assert!(state.merge(&second, &reducer, &config, &mut metrics, &|| false));
        let order: Vec<u64> = state
            .paths
            .iter()
            .map(|p| p.sequence_index.unwrap().0)
            .collect();
        assert_eq!(order, vec![1, 2, 4]);
        assert_eq!(state.heat.get(0, 0), Some(&2));
        assert_eq!(metrics.records_applied, 3);
    }

    #[test]
    fn disabled_projections_stay_empty() {
        let config = EngineConfig {
            collect_paths: false,
            track_heat: false,
            ..EngineConfig::default()
        };
        let log: EditLog = [path_record(3, 0)].into_iter().collect();
        let mut metrics = ReplayMetrics::default();
        let state =
            DerivedState::replay(&log, &MergeReducer::default(), &config, &mut metrics, &|| false)
                .unwrap();
        assert!(state.paths.is_empty());
        assert!(state.heat.is_empty());
        assert!(metrics.full_replay);
    }

    #[test]
    fn cancelled_replay_publishes_nothing() {
        let log: EditLog = [EditRecord::at(Position::new(0, 0))
            .index(0u64)
            .edit(TileEdit::replace(TileCell::tile(TileId(1))))]
        .into_iter()
        .collect();
        let mut metrics = ReplayMetrics::default();
        let out = DerivedState::replay(
            &log,
            &MergeReducer::default(),
            &EngineConfig::default(),
            &mut metrics,
            &|| true,
        );
        assert!(out.is_none());
    }
}
