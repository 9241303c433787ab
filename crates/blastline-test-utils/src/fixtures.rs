//! Reusable grid and record fixtures.

use blastline_core::{
    EditAction, EditRecord, EditSource, PathData, PointF, Position, TileCatalog, TileCell,
    TileData, TileEdit, TileId, TileSet,
};
use blastline_grid::{EditLog, TileGrid};

/// Ids of the standard tile set, looked up by key once.
#[derive(Clone, Copy, Debug)]
pub struct StandardTiles {
    pub air: TileId,
    pub void: TileId,
    pub stone: TileId,
    pub dirt: TileId,
    pub grass: TileId,
    pub sand: TileId,
    pub water: TileId,
    pub cobble: TileId,
}

impl StandardTiles {
    pub fn of(set: &TileSet) -> Self {
        let id = |key: &str| {
            set.id_of(key)
                .unwrap_or_else(|| panic!("standard tile set is missing '{key}'"))
        };
        Self {
            air: set.air(),
            void: set.void(),
            stone: id("minecraft:stone"),
            dirt: id("minecraft:dirt"),
            grass: id("minecraft:grass"),
            sand: id("minecraft:sand"),
            water: id("minecraft:water"),
            cobble: id("minecraft:cobble"),
        }
    }
}

/// The standard catalog together with its resolved ids.
pub fn standard() -> (TileSet, StandardTiles) {
    let set = TileSet::standard();
    let ids = StandardTiles::of(&set);
    (set, ids)
}

/// A grid with `id` in every cell of the `width x height` rectangle at `(x0, y0)`.
pub fn filled_grid(id: TileId, x0: i32, y0: i32, width: i32, height: i32) -> TileGrid {
    let mut grid = TileGrid::new();
    fill(&mut grid, id, x0, y0, width, height);
    grid
}

/// Overwrite the rectangle with `id`.
pub fn fill(grid: &mut TileGrid, id: TileId, x0: i32, y0: i32, width: i32, height: i32) {
    for x in x0..x0 + width {
        for y in y0..y0 + height {
            grid.set(x, y, TileCell::tile(id));
        }
    }
}

/// A tile cell with stored power.
pub fn powered(id: TileId, power: f64) -> TileCell {
    TileCell::tile(id).with_data(TileData {
        energy_power: Some(power),
        ..TileData::default()
    })
}

/// Record placing `id` at `(x, y)` with sequence index `index`.
pub fn place(x: i32, y: i32, index: u64, id: TileId) -> EditRecord {
    EditRecord::at(Position::new(x, y))
        .index(index)
        .edit(TileEdit::replace(TileCell::tile(id)))
}

/// Record placing `cell` at `(x, y)` with the given action.
pub fn edit(x: i32, y: i32, index: u64, action: EditAction, cell: TileCell) -> EditRecord {
    EditRecord::at(Position::new(x, y))
        .index(index)
        .edit(TileEdit::with_action(action, cell))
}

/// Attribute-only record changing `energy_power` with `action`.
pub fn power_edit(x: i32, y: i32, index: u64, action: EditAction, power: f64) -> EditRecord {
    edit(
        x,
        y,
        index,
        action,
        TileCell::attributes(TileData {
            energy_power: Some(power),
            ..TileData::default()
        }),
    )
}

/// Path-only record at `(x, y)` with a unit segment ending in the cell.
pub fn trace(x: i32, y: i32, index: u64) -> EditRecord {
    let pos = Position::new(x, y);
    EditRecord::at(pos)
        .index(index)
        .path(PathData::segment(
            PointF::new(f64::from(x) - 0.5, f64::from(y) + 0.5),
            PointF::center_of(pos),
        ))
}

/// Attach a source identity.
pub fn sourced(record: EditRecord, key: &str, phase: Option<&str>, phase_index: u64) -> EditRecord {
    record.source(EditSource {
        key: key.to_string(),
        phase: phase.map(str::to_string),
        phase_index,
    })
}

/// Collect records into a log.
pub fn log_of(records: impl IntoIterator<Item = EditRecord>) -> EditLog {
    records.into_iter().collect()
}

/// Number of records in `log` carrying a tile edit.
pub fn edit_count(log: &EditLog) -> usize {
    log.records().filter(|r| r.has_tile_edit()).count()
}

/// Number of records in `log` carrying a path.
pub fn path_count(log: &EditLog) -> usize {
    log.records().filter(|r| r.has_path()).count()
}

/// Records in `log` sorted by sequence index.
pub fn in_sequence(log: &EditLog) -> Vec<EditRecord> {
    let mut records: Vec<EditRecord> = log.records().cloned().collect();
    records.sort_by_key(|r| r.sequence_index);
    records
}
