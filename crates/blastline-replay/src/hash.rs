//! Hashing utilities for derived-state comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing of timeline projections.
//! These hashes are not cryptographically secure; they are used for fast
//! equality checks between two replays of the same record stream.
//!
//! Grids are hashed in position order, not insertion order, so two grids
//! holding the same cells hash equally however they were built.

use blastline_core::{PointF, Position, TileCell};
use blastline_engine::{PathTrace, TimelineView};
use blastline_grid::{HeatGrid, TileGrid};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u32(hash: u64, v: u32) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

/// Presence flag followed by the value, so `None` and `Some(0)` differ.
#[inline]
fn fnv1a_opt_f64(hash: u64, v: Option<f64>) -> u64 {
    match v {
        None => fnv1a_byte(hash, 0),
        Some(v) => fnv1a_u64(fnv1a_byte(hash, 1), v.to_bits()),
    }
}

#[inline]
fn fnv1a_pos(hash: u64, pos: Position) -> u64 {
    fnv1a_u32(fnv1a_u32(hash, pos.x as u32), pos.y as u32)
}

#[inline]
fn fnv1a_point(hash: u64, p: PointF) -> u64 {
    fnv1a_u64(fnv1a_u64(hash, p.x.to_bits()), p.y.to_bits())
}

fn fnv1a_cell(mut hash: u64, cell: &TileCell) -> u64 {
    hash = match cell.tile_id {
        None => fnv1a_byte(hash, 0),
        Some(id) => fnv1a_u32(fnv1a_byte(hash, 1), id.0),
    };
    match cell.data.as_ref() {
        None => fnv1a_byte(hash, 0),
        Some(data) => {
            hash = fnv1a_byte(hash, 1);
            hash = match data.facing {
                None => fnv1a_byte(hash, 0),
                Some(f) => fnv1a_byte(fnv1a_byte(hash, 1), f),
            };
            hash = fnv1a_opt_f64(hash, data.energy_power);
            fnv1a_opt_f64(hash, data.energy_heat)
        }
    }
}

/// Hash every stored tile cell, in `(x, y)` order.
///
/// Returns `FNV_OFFSET` (non-zero) for an empty grid.
pub fn tile_hash(tiles: &TileGrid) -> u64 {
    let mut cells: Vec<(Position, &TileCell)> = tiles.iter().collect();
    cells.sort_by_key(|(pos, _)| *pos);
    cells
        .into_iter()
        .fold(FNV_OFFSET, |hash, (pos, cell)| fnv1a_cell(fnv1a_pos(hash, pos), cell))
}

/// Hash every stored heat count, in `(x, y)` order.
pub fn heat_hash(heat: &HeatGrid) -> u64 {
    let mut cells: Vec<(Position, u32)> = heat.iter().map(|(p, n)| (p, *n)).collect();
    cells.sort_by_key(|(pos, _)| *pos);
    cells
        .into_iter()
        .fold(FNV_OFFSET, |hash, (pos, n)| fnv1a_u32(fnv1a_pos(hash, pos), n))
}

/// Hash the path list in its stored order: index, endpoints, and end type.
pub fn path_hash(paths: &[PathTrace]) -> u64 {
    paths.iter().fold(FNV_OFFSET, |mut hash, trace| {
        hash = match trace.sequence_index {
            None => fnv1a_byte(hash, 0),
            Some(i) => fnv1a_u64(fnv1a_byte(hash, 1), i.0),
        };
        hash = fnv1a_point(hash, trace.path.start);
        hash = fnv1a_point(hash, trace.path.end);
        fnv1a_byte(hash, trace.path.meta.end_type() as u8)
    })
}

/// Combined hash of a view's tiles, heat, paths, and cursor.
pub fn view_hash(view: &TimelineView) -> u64 {
    let mut hash = FNV_OFFSET;
    hash = fnv1a_u64(hash, view.current_index.0);
    hash = fnv1a_u64(hash, tile_hash(&view.tiles));
    hash = fnv1a_u64(hash, heat_hash(&view.heat));
    fnv1a_u64(hash, path_hash(&view.paths))
}
