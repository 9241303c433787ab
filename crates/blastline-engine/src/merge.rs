//! Merge-down reducers that resolve a cell's records into one value.
//!
//! Records reach a reducer already filtered (tile edits or path
//! carriers) and ordered by [`ordered`]. The tile reducers fold forward
//! from the cell's previous derived value; the heat reducer counts.

use blastline_core::{EditAction, EditRecord, TileCell, TileData};
use serde::{Deserialize, Serialize};

use crate::metrics::ReplayMetrics;

/// How a cell's records are reduced into a projection value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Fold edits in sequence order; an id change discards accumulated
    /// data, same-id edits merge attributes through their action.
    #[default]
    Override,
    /// Take the highest-indexed edit that defines a value.
    LastDefined,
    /// Add the number of path-carrying records to the previous count.
    Accumulate,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::LastDefined => write!(f, "last_defined"),
            Self::Accumulate => write!(f, "accumulate"),
        }
    }
}

/// Records matching `keep`, sorted by sequence index.
///
/// Records without an index sort first, keeping their relative order.
pub fn ordered<'a>(
    records: impl IntoIterator<Item = &'a EditRecord>,
    keep: impl Fn(&EditRecord) -> bool,
) -> Vec<&'a EditRecord> {
    let mut out: Vec<&EditRecord> = records.into_iter().filter(|r| keep(*r)).collect();
    out.sort_by_key(|r| r.sequence_index);
    out
}

/// Stateless reducer for the tile projection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReducer {
    policy: MergePolicy,
}

impl MergeReducer {
    /// Reducer applying `policy` to tile edits.
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    /// The configured policy.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Resolve ordered tile edits on top of `previous`.
    ///
    /// Returns `None` when the cell should be left unchanged.
    pub fn reduce_tile(
        &self,
        previous: Option<&TileCell>,
        records: &[&EditRecord],
        metrics: &mut ReplayMetrics,
    ) -> Option<TileCell> {
        match self.policy {
            MergePolicy::Override => merge_override(previous, records, metrics),
            MergePolicy::LastDefined => last_defined(records),
            // Counting has no tile meaning; EngineConfig::validate rejects it.
            MergePolicy::Accumulate => None,
        }
    }
}

/// Fold tile edits left to right starting from `previous`.
pub fn merge_override(
    previous: Option<&TileCell>,
    records: &[&EditRecord],
    metrics: &mut ReplayMetrics,
) -> Option<TileCell> {
    let mut acc = previous.cloned().unwrap_or_default();
    for record in records {
        let Some(edit) = record.edit.as_ref() else {
            continue;
        };
        let incoming = &edit.new_value;

        match incoming.tile_id {
            Some(id) if acc.tile_id != Some(id) => {
                acc.tile_id = Some(id);
                acc.data = None;
            }
            Some(_) => {}
            None if acc.tile_id.is_none() => {
                tracing::warn!(
                    x = record.x,
                    y = record.y,
                    index = ?record.sequence_index,
                    source = record.source_key().unwrap_or(""),
                    "attribute edit on a cell with no tile id, skipped"
                );
                metrics.orphan_edits += 1;
                continue;
            }
            None => {}
        }

        if let Some(data) = incoming.data.as_ref() {
            acc.data = Some(match acc.data.take() {
                None => data.clone(),
                Some(current) => merge_data(current, data, edit.action),
            });
        }
    }
    acc.tile_id.is_some().then_some(acc)
}

/// The highest-indexed record whose `new_value` defines anything.
pub fn last_defined(records: &[&EditRecord]) -> Option<TileCell> {
    records
        .iter()
        .rev()
        .filter_map(|r| r.edit.as_ref())
        .map(|e| &e.new_value)
        .find(|v| v.tile_id.is_some() || v.data.is_some())
        .cloned()
}

/// Previous count plus the number of path-carrying records.
pub fn accumulate(previous: Option<u32>, records: &[&EditRecord]) -> u32 {
    let added = records.iter().filter(|r| r.has_path()).count();
    previous
        .unwrap_or(0)
        .saturating_add(u32::try_from(added).unwrap_or(u32::MAX))
}

fn merge_data(mut current: TileData, incoming: &TileData, action: EditAction) -> TileData {
    current.facing = incoming.facing.or(current.facing);
    current.energy_heat = combine(action, current.energy_heat, incoming.energy_heat);
    current.energy_power = combine(action, current.energy_power, incoming.energy_power);
    current
}

/// Apply `action` to an attribute. A missing operand yields the other
/// operand; a non-finite result keeps the current value.
fn combine(action: EditAction, current: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    let (a, b) = match (current, incoming) {
        (Some(a), Some(b)) => (a, b),
        (a, b) => {
            return match action {
                EditAction::Override => b.or(a),
                EditAction::Add | EditAction::Subtract => a.or(b),
            }
        }
    };
    let value = match action {
        EditAction::Override => b,
        EditAction::Add => a + b,
        EditAction::Subtract => a - b,
    };
    if value.is_nan() {
        Some(a)
    } else {
        Some(value)
    }
}
