//! Per-cell record lists produced by generators and consumed by the engine.

use blastline_core::{EditRecord, Position, SequenceIndex};
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::sparse::SparseGrid;

/// A sparse grid of edit records, appended per cell in emission order.
///
/// A log is self-contained: it carries every record of one or more
/// generator runs and never references engine state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditLog {
    cells: SparseGrid<Vec<EditRecord>>,
}

impl EditLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to its target cell.
    pub fn push(&mut self, record: EditRecord) {
        self.cells
            .get_or_insert_with(record.position(), Vec::new)
            .push(record);
    }

    /// Records at `(x, y)`, in append order.
    pub fn cell(&self, x: i32, y: i32) -> &[EditRecord] {
        self.cells.get(x, y).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any record targets `pos`.
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_at(pos)
    }

    /// Cells with their record lists, in first-touch order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, &[EditRecord])> + '_ {
        self.cells.iter().map(|(p, v)| (p, v.as_slice()))
    }

    /// Every record, cell by cell.
    pub fn records(&self) -> impl Iterator<Item = &EditRecord> + '_ {
        self.cells.iter().flat_map(|(_, v)| v.iter())
    }

    /// Consume the log, yielding every record cell by cell.
    pub fn into_records(self) -> impl Iterator<Item = EditRecord> {
        self.cells.into_iter().flat_map(|(_, v)| v)
    }

    /// Total number of records.
    pub fn record_count(&self) -> usize {
        self.cells.iter().map(|(_, v)| v.len()).sum()
    }

    /// Number of touched cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the log has no records.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds of the touched cells.
    pub fn bounds(&self) -> Bounds {
        self.cells.bounds()
    }

    /// Highest sequence index in the log.
    pub fn max_index(&self) -> Option<SequenceIndex> {
        self.records().filter_map(|r| r.sequence_index).max()
    }

    /// Move every record of `other` into this log.
    pub fn extend(&mut self, other: EditLog) {
        for record in other.into_records() {
            self.push(record);
        }
    }

    /// Borrow the underlying grid.
    pub fn grid(&self) -> &SparseGrid<Vec<EditRecord>> {
        &self.cells
    }

    /// Unwrap into the underlying grid.
    pub fn into_grid(self) -> SparseGrid<Vec<EditRecord>> {
        self.cells
    }
}

impl FromIterator<EditRecord> for EditLog {
    fn from_iter<I: IntoIterator<Item = EditRecord>>(iter: I) -> Self {
        let mut log = EditLog::new();
        for record in iter {
            log.push(record);
        }
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(x: i32, y: i32, i: u64) -> EditRecord {
        EditRecord::at(Position::new(x, y)).index(i)
    }

    #[test]
    fn push_groups_by_cell_in_append_order() {
        let log: EditLog = [rec(1, 1, 5), rec(0, 0, 2), rec(1, 1, 3)].into_iter().collect();
        assert_eq!(log.cell_count(), 2);
        assert_eq!(log.record_count(), 3);
        let at: Vec<u64> = log
            .cell(1, 1)
            .iter()
            .filter_map(|r| r.sequence_index)
            .map(|i| i.0)
            .collect();
        assert_eq!(at, vec![5, 3]);
        assert!(log.cell(9, 9).is_empty());
        assert_eq!(log.max_index(), Some(SequenceIndex(5)));
    }

    #[test]
    fn extend_moves_records() {
        let mut a: EditLog = [rec(0, 0, 0)].into_iter().collect();
        let b: EditLog = [rec(0, 0, 1), rec(-3, 2, 2)].into_iter().collect();
        a.extend(b);
        assert_eq!(a.record_count(), 3);
        assert_eq!(a.cell(0, 0).len(), 2);
        assert_eq!(a.bounds().start, Position::new(-3, 0));
    }
}
