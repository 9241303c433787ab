//! Sparse grid storage for Blastline simulations.
//!
//! Provides [`SparseGrid`], the insertion-ordered position map every
//! projection is stored in, its growing [`Bounds`], and [`EditLog`],
//! the per-cell record list that generators produce and the engine
//! replays.

#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bounds;
pub mod edit_log;
pub mod sparse;

pub use bounds::Bounds;
pub use edit_log::EditLog;
pub use sparse::SparseGrid;

use blastline_core::{TileCatalog, TileCell, TileId};

/// Derived tile state: one merged [`TileCell`] per touched cell.
pub type TileGrid = SparseGrid<TileCell>;

/// Derived visitation counts: path-carrying records per cell.
pub type HeatGrid = SparseGrid<u32>;

/// Tile id at `(x, y)`, reading absent cells and cells without a
/// recorded id as the catalog's air tile.
pub fn tile_or_air(grid: &TileGrid, catalog: &dyn TileCatalog, x: i32, y: i32) -> TileId {
    grid.get(x, y)
        .and_then(|cell| cell.tile_id)
        .unwrap_or_else(|| catalog.air())
}
