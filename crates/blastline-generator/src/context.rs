//! Execution context passed to generators.
//!
//! [`GenContext`] gives a generator read-only access to the current tile
//! grid and the catalog, a seeded random source, and an append-only
//! output log. Every emitted record is stamped with the run's source key,
//! a per-phase `phase_index`, and the next index from the session's
//! [`SequenceAllocator`].

use blastline_core::{
    EditRecord, EditSource, Position, SequenceAllocator, SequenceIndex, TileCatalog, TileCell,
    TileId, TileProps,
};
use blastline_grid::{tile_or_air, EditLog, TileGrid};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GeneratorError;

/// Execution context for one generator run.
pub struct GenContext<'a> {
    grid: &'a TileGrid,
    catalog: &'a dyn TileCatalog,
    sequence: &'a mut SequenceAllocator,
    rng: ChaCha8Rng,
    source_key: String,
    phase_counters: IndexMap<String, u64>,
    pending_reads: u32,
    log: EditLog,
}

impl<'a> GenContext<'a> {
    /// Construct a context for the run identified by `source_key`.
    ///
    /// Typically called by [`run_generator`](crate::run_generator). For
    /// testing, construct one directly against a fixture grid.
    pub fn new(
        grid: &'a TileGrid,
        catalog: &'a dyn TileCatalog,
        sequence: &'a mut SequenceAllocator,
        source_key: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self {
            grid,
            catalog,
            sequence,
            rng: ChaCha8Rng::seed_from_u64(seed),
            source_key: source_key.into(),
            phase_counters: IndexMap::new(),
            pending_reads: 0,
            log: EditLog::new(),
        }
    }

    /// Source key stamped on every record of this run.
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    /// The tile catalog.
    pub fn catalog(&self) -> &dyn TileCatalog {
        self.catalog
    }

    /// The grid being read.
    pub fn grid(&self) -> &TileGrid {
        self.grid
    }

    /// The run's random source.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Uniform sample in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Tile id at `pos`; absent cells read as air.
    pub fn tile_at(&mut self, pos: Position) -> TileId {
        self.pending_reads += 1;
        tile_or_air(self.grid, self.catalog, pos.x, pos.y)
    }

    /// Raw cell value at `pos`, if stored.
    pub fn cell_at(&mut self, pos: Position) -> Option<&'a TileCell> {
        self.pending_reads += 1;
        self.grid.get_at(pos)
    }

    /// Properties of `id`, or [`GeneratorError::UnknownTile`].
    pub fn props(&self, id: TileId) -> Result<TileProps, GeneratorError> {
        Ok(self.catalog.require(id)?)
    }

    /// Tile id and properties at `pos`.
    pub fn tile_props_at(&mut self, pos: Position) -> Result<(TileId, TileProps), GeneratorError> {
        let id = self.tile_at(pos);
        Ok((id, self.props(id)?))
    }

    /// Stamp `record` with this run's identity and append it to the log.
    ///
    /// Grid reads made since the previous emission are attached as the
    /// record's `map_access_count`.
    pub fn emit(&mut self, phase: Option<&str>, mut record: EditRecord) -> SequenceIndex {
        let counter = self
            .phase_counters
            .entry(phase.unwrap_or_default().to_string())
            .or_insert(0);
        let phase_index = *counter;
        *counter += 1;

        let index = self.sequence.allocate();
        record.sequence_index = Some(index);
        record.source = Some(EditSource {
            key: self.source_key.clone(),
            phase: phase.map(str::to_string),
            phase_index,
        });
        if self.pending_reads > 0 {
            record.map_access_count = Some(self.pending_reads);
            self.pending_reads = 0;
        }
        self.log.push(record);
        index
    }

    /// Whether this run already emitted a record at `pos`.
    pub fn visited(&self, pos: Position) -> bool {
        self.log.contains(pos)
    }

    /// The records emitted so far.
    pub fn log(&self) -> &EditLog {
        &self.log
    }

    /// Finish the run, yielding its records.
    pub fn into_edit_log(self) -> EditLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastline_core::TileSet;

    #[test]
    fn emit_assigns_global_and_per_phase_indices() {
        let grid = TileGrid::new();
        let catalog = TileSet::standard();
        let mut seq = SequenceAllocator::starting_at(40);
        let mut ctx = GenContext::new(&grid, &catalog, &mut seq, "TNT-2", 0);

        ctx.emit(Some("ray-0"), EditRecord::at(Position::new(0, 0)));
        ctx.emit(Some("ray-1"), EditRecord::at(Position::new(1, 0)));
        ctx.emit(Some("ray-0"), EditRecord::at(Position::new(2, 0)));

        let log = ctx.into_edit_log();
        let third = &log.cell(2, 0)[0];
        assert_eq!(third.sequence_index, Some(SequenceIndex(42)));
        let src = third.source.as_ref().unwrap();
        assert_eq!(src.key, "TNT-2");
        assert_eq!(src.phase.as_deref(), Some("ray-0"));
        assert_eq!(src.phase_index, 1);
        assert_eq!(log.cell(1, 0)[0].source.as_ref().unwrap().phase_index, 0);
        assert_eq!(seq.peek(), SequenceIndex(43));
    }

    #[test]
    fn reads_are_attached_to_next_emission() {
        let grid = TileGrid::new();
        let catalog = TileSet::standard();
        let mut seq = SequenceAllocator::new();
        let mut ctx = GenContext::new(&grid, &catalog, &mut seq, "t", 0);
        assert_eq!(ctx.tile_at(Position::new(9, 9)), catalog.air());
        ctx.tile_at(Position::new(9, 8));
        ctx.emit(None, EditRecord::at(Position::new(9, 9)));
        ctx.emit(None, EditRecord::at(Position::new(9, 8)));
        assert!(ctx.visited(Position::new(9, 9)));
        let log = ctx.into_edit_log();
        assert_eq!(log.cell(9, 9)[0].map_access_count, Some(2));
        assert_eq!(log.cell(9, 8)[0].map_access_count, None);
    }

    #[test]
    fn same_seed_same_samples() {
        let grid = TileGrid::new();
        let catalog = TileSet::standard();
        let mut seq_a = SequenceAllocator::new();
        let mut seq_b = SequenceAllocator::new();
        let mut a = GenContext::new(&grid, &catalog, &mut seq_a, "a", 7);
        let mut b = GenContext::new(&grid, &catalog, &mut seq_b, "b", 7);
        for _ in 0..8 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn unknown_grid_tile_is_an_error() {
        let mut grid = TileGrid::new();
        grid.set(0, 0, TileCell::tile(TileId(500)));
        let catalog = TileSet::standard();
        let mut seq = SequenceAllocator::new();
        let mut ctx = GenContext::new(&grid, &catalog, &mut seq, "t", 0);
        assert_eq!(
            ctx.tile_props_at(Position::new(0, 0)),
            Err(GeneratorError::UnknownTile { id: TileId(500) })
        );
    }
}
