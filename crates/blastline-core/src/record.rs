//! The edit-record stream model.
//!
//! An [`EditRecord`] is one atomic, sequenced, attributable event at a
//! cell. It may propose a tile mutation ([`TileEdit`]), carry a traced
//! path segment for visualisation ([`PathData`]), or both. Absence of a
//! sub-structure is the only valid "no-op" signal: consumers never infer
//! intent from default values.

use serde::{Deserialize, Serialize};

use crate::id::SequenceIndex;
use crate::pos::{PointF, Position};
use crate::tile::TileCell;

/// How a [`TileEdit`]'s numeric attributes combine with existing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    /// Add incoming attribute values to the current ones.
    Add,
    /// Subtract incoming attribute values from the current ones.
    Subtract,
    /// Replace current attribute values with defined incoming ones.
    #[default]
    Override,
}

/// A proposed tile mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileEdit {
    /// Combination rule for attribute values.
    #[serde(default)]
    pub action: EditAction,
    /// The value to apply. A missing `tile_id` makes this an attribute-only edit.
    pub new_value: TileCell,
    /// The value the generator observed before the edit, for inspection only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<TileCell>,
}

impl TileEdit {
    /// An override edit placing `new_value`.
    pub fn replace(new_value: TileCell) -> Self {
        Self {
            action: EditAction::Override,
            new_value,
            old_value: None,
        }
    }

    /// An edit with an explicit action.
    pub fn with_action(action: EditAction, new_value: TileCell) -> Self {
        Self {
            action,
            new_value,
            old_value: None,
        }
    }

    /// Record what the cell held before the edit.
    pub fn observed(mut self, old_value: Option<TileCell>) -> Self {
        self.old_value = old_value;
        self
    }
}

/// Identity of the simulation step that produced a record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditSource {
    /// One simulation run, e.g. `TNT-3`.
    pub key: String,
    /// Groups related sub-steps of the run, e.g. `ray-4` or `fluids`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Orders steps within the phase, ignoring other phases.
    #[serde(default)]
    pub phase_index: u64,
}

impl EditSource {
    /// A source with a key only.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: None,
            phase_index: 0,
        }
    }

    /// A source with key, phase, and phase index.
    pub fn phased(key: impl Into<String>, phase: impl Into<String>, phase_index: u64) -> Self {
        Self {
            key: key.into(),
            phase: Some(phase.into()),
            phase_index,
        }
    }

    /// Bookmark key for this source's phase: `"<key>:<phase>"`.
    pub fn phase_key(&self) -> Option<String> {
        self.phase.as_ref().map(|p| format!("{}:{}", self.key, p))
    }
}

/// How a traced path segment ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndType {
    /// The path moved on to the next position.
    #[default]
    Continue,
    /// The path hit a stopping limit (depth, energy).
    Done,
    /// The path ran into an earlier path.
    Collision,
    /// The path ran out of options.
    Dead,
}

/// What the path did at its node position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Touched something but changed nothing.
    Hit,
    /// Caused a change on the map.
    Action,
    /// The position was skipped.
    Ignore,
}

/// Which endpoint of a segment is the node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodePos {
    /// [`PathData::start`].
    Start,
    /// [`PathData::end`].
    #[default]
    End,
}

/// Context attached to a traced segment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathMeta {
    /// How the segment ended; readers default to [`EndType::Continue`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_type: Option<EndType>,
    /// Node drawn at the node position, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    /// Which end holds the node; readers default to [`NodePos::End`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_pos: Option<NodePos>,
    /// Energy left after processing the step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_left: Option<f64>,
    /// Energy spent on the step's tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_cost: Option<f64>,
}

impl PathMeta {
    /// Effective end type.
    pub fn end_type(&self) -> EndType {
        self.end_type.unwrap_or_default()
    }

    /// Effective node position.
    pub fn node_pos(&self) -> NodePos {
        self.node_pos.unwrap_or_default()
    }
}

/// A traced path segment, used for visualisation and heat accounting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    /// Segment start.
    pub start: PointF,
    /// Segment end.
    pub end: PointF,
    /// Segment metadata.
    #[serde(default)]
    pub meta: PathMeta,
}

impl PathData {
    /// A segment with empty metadata.
    pub fn segment(start: PointF, end: PointF) -> Self {
        Self {
            start,
            end,
            meta: PathMeta::default(),
        }
    }

    /// Set the end type.
    pub fn end_type(mut self, end_type: EndType) -> Self {
        self.meta.end_type = Some(end_type);
        self
    }

    /// Set the node type.
    pub fn node_type(mut self, node_type: NodeType) -> Self {
        self.meta.node_type = Some(node_type);
        self
    }

    /// Set the remaining and spent energy.
    pub fn energy(mut self, left: f64, cost: f64) -> Self {
        self.meta.energy_left = Some(left);
        self.meta.energy_cost = Some(cost);
        self
    }

    /// The endpoint that holds the node.
    pub fn node_point(&self) -> PointF {
        match self.meta.node_pos() {
            NodePos::Start => self.start,
            NodePos::End => self.end,
        }
    }
}

/// One atomic unit of the edit stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Target column.
    pub x: i32,
    /// Target row.
    pub y: i32,
    /// Global sort key. `None` marks a malformed record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_index: Option<SequenceIndex>,
    /// Producing run and phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EditSource>,
    /// Proposed tile mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<TileEdit>,
    /// Traced segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathData>,
    /// Grid reads performed producing this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_access_count: Option<u32>,
}

impl EditRecord {
    /// An empty record targeting `pos`.
    pub fn at(pos: Position) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            ..Self::default()
        }
    }

    /// Set the sequence index.
    pub fn index(mut self, index: impl Into<SequenceIndex>) -> Self {
        self.sequence_index = Some(index.into());
        self
    }

    /// Set the source identity.
    pub fn source(mut self, source: EditSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the tile edit.
    pub fn edit(mut self, edit: TileEdit) -> Self {
        self.edit = Some(edit);
        self
    }

    /// Set the traced path.
    pub fn path(mut self, path: PathData) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the map access count.
    pub fn map_access(mut self, count: u32) -> Self {
        self.map_access_count = Some(count);
        self
    }

    /// The target cell.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Whether the record proposes a tile mutation.
    pub fn has_tile_edit(&self) -> bool {
        self.edit.is_some()
    }

    /// Whether the record carries a traced path.
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Source key, if any.
    pub fn source_key(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.key.as_str())
    }
}
