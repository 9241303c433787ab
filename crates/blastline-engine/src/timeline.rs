//! The event-sourced timeline engine.
//!
//! [`TimelineEngine`] owns the applied record stream and every projection
//! derived from it. Batches are merged incrementally when the cursor is
//! at the head of the timeline; scrubbing rebuilds derived state from an
//! empty grid over the prefix of records at or below the cursor, so the
//! derived state always equals a replay of that prefix.

use std::sync::Arc;
use std::time::Instant;

use blastline_core::{EditRecord, SequenceAllocator, SequenceIndex, TileCatalog};
use blastline_generator::{Generator, GeneratorError, ParamValues};
use blastline_grid::{EditLog, HeatGrid, TileGrid};

use crate::bookmark::{compute_bookmarks, group_bookmarks, Bookmark, BookmarkGroup};
use crate::config::{ConfigError, EngineConfig};
use crate::merge::MergeReducer;
use crate::metrics::ReplayMetrics;
use crate::view::{DerivedState, PathTrace, TimelineView};

/// Single-threaded owner of the edit stream and its projections.
pub struct TimelineEngine {
    config: EngineConfig,
    reducer: MergeReducer,
    catalog: Arc<dyn TileCatalog>,
    entries: Vec<EditRecord>,
    bookmarks: Vec<Bookmark>,
    max_index: SequenceIndex,
    current_index: SequenceIndex,
    state: DerivedState,
    sequence: SequenceAllocator,
    runs: u64,
    metrics: ReplayMetrics,
}

impl TimelineEngine {
    /// Create an empty engine.
    ///
    /// # Errors
    ///
    /// Returns the first problem found by [`EngineConfig::validate`].
    pub fn new(config: EngineConfig, catalog: Arc<dyn TileCatalog>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            reducer: MergeReducer::new(config.tile_policy),
            config,
            catalog,
            entries: Vec::new(),
            bookmarks: Vec::new(),
            max_index: SequenceIndex::default(),
            current_index: SequenceIndex::default(),
            state: DerivedState::default(),
            sequence: SequenceAllocator::new(),
            runs: 0,
            metrics: ReplayMetrics::default(),
        })
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Merge a generator's records into the timeline.
    ///
    /// Records without a sequence index are accepted with a warning; they
    /// reach the derived state only through this incremental merge and
    /// never survive a replay.
    pub fn apply_batch(&mut self, log: EditLog) {
        let start = Instant::now();
        let mut metrics = ReplayMetrics::default();

        for record in log.records().filter(|r| r.sequence_index.is_none()) {
            tracing::warn!(
                x = record.x,
                y = record.y,
                source = record.source_key().unwrap_or(""),
                "edit record has no sequence index, replay will skip it"
            );
            metrics.missing_index += 1;
        }

        let scrubbed = self.current_index < self.max_index;
        let rebuild = scrubbed || !self.config.advance_on_apply || self.reaches_back(&log);
        if !rebuild {
            self.state
                .merge(&log, &self.reducer, &self.config, &mut metrics, &|| false);
        }

        self.entries.extend(log.into_records());
        self.entries.sort_by_key(|r| r.sequence_index);
        self.max_index = self
            .entries
            .iter()
            .filter_map(|r| r.sequence_index)
            .max()
            .unwrap_or_default();
        if !self.entries.is_empty() {
            self.sequence.advance_past(self.max_index);
        }
        self.bookmarks = compute_bookmarks(&self.entries);
        if self.config.advance_on_apply {
            self.current_index = self.max_index;
        }

        if rebuild {
            self.rebuild(&mut metrics);
        }
        metrics.elapsed_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            entries = self.entries.len(),
            current = %self.current_index,
            max = %self.max_index,
            full_replay = metrics.full_replay,
            "batch applied"
        );
        self.metrics = metrics;
    }

    /// Whether `log` holds an index at or below one already applied, so
    /// folding it on top of the current state would misorder a cell.
    fn reaches_back(&self, log: &EditLog) -> bool {
        let applied = self.entries.last().and_then(|r| r.sequence_index).is_some();
        applied
            && log
                .records()
                .filter_map(|r| r.sequence_index)
                .min()
                .is_some_and(|lowest| lowest <= self.max_index)
    }

    /// Write `record`'s new value straight into the tile projection.
    ///
    /// Bypasses merging, paths, heat, and bookmarks; the record is not
    /// kept and disappears on the next replay.
    pub fn apply_single(&mut self, record: &EditRecord) {
        if let Some(edit) = record.edit.as_ref() {
            self.state.tiles.set_at(record.position(), edit.new_value.clone());
        }
    }

    /// Move the cursor to `index` and rebuild derived state for the
    /// records at or below it.
    pub fn select_index(&mut self, index: SequenceIndex) {
        let start = Instant::now();
        let mut metrics = ReplayMetrics::default();
        self.current_index = index;
        self.rebuild(&mut metrics);
        metrics.elapsed_us = start.elapsed().as_micros() as u64;
        tracing::debug!(current = %index, cells = self.state.tiles.len(), "scrubbed");
        self.metrics = metrics;
    }

    /// Step the cursor forward by one index, if not already at the head.
    pub fn select_next(&mut self) {
        if self.current_index < self.max_index {
            self.select_index(self.current_index.next());
        }
    }

    /// Drop every record and projection and restart index allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.bookmarks.clear();
        self.max_index = SequenceIndex::default();
        self.current_index = SequenceIndex::default();
        self.state = DerivedState::default();
        self.sequence.reset();
        self.runs = 0;
        self.metrics = ReplayMetrics::default();
        tracing::debug!("timeline cleared");
    }

    /// Run `generator` against the current tiles and apply its records.
    ///
    /// The run's source key is `"<prefix>-<run>"`, where `run` counts
    /// generator runs since the last [`clear`](Self::clear). A failed run
    /// applies nothing and does not consume a run number.
    pub fn run_generator(
        &mut self,
        generator: &dyn Generator,
        params: &ParamValues,
        seed: u64,
    ) -> Result<String, GeneratorError> {
        let key = format!("{}-{}", generator.source_prefix(), self.runs);
        let log = blastline_generator::run_generator(
            generator,
            &self.state.tiles,
            self.catalog.as_ref(),
            &mut self.sequence,
            &key,
            params,
            seed,
        )?;
        self.runs += 1;
        self.apply_batch(log);
        Ok(key)
    }

    // ── Replay ─────────────────────────────────────────────────────

    /// Derive the view at `index` without touching the engine.
    ///
    /// Returns `None` if `cancelled` fires before the replay finishes.
    pub fn replay_to(
        &self,
        index: SequenceIndex,
        cancelled: &dyn Fn() -> bool,
    ) -> Option<TimelineView> {
        let mut metrics = ReplayMetrics::default();
        let state = DerivedState::replay(
            &self.prefix(index),
            &self.reducer,
            &self.config,
            &mut metrics,
            cancelled,
        )?;
        Some(TimelineView::from_state(
            state,
            self.bookmarks.clone(),
            index,
            self.max_index,
        ))
    }

    fn prefix(&self, index: SequenceIndex) -> EditLog {
        self.entries
            .iter()
            .filter(|r| r.sequence_index.is_some_and(|i| i <= index))
            .cloned()
            .collect()
    }

    fn rebuild(&mut self, metrics: &mut ReplayMetrics) {
        let log = self.prefix(self.current_index);
        // Never cancelled, so replay always returns a state.
        self.state = DerivedState::replay(&log, &self.reducer, &self.config, metrics, &|| false)
            .unwrap_or_default();
    }

    /// Replace the derived state and cursor with a replayed view.
    pub(crate) fn install(&mut self, view: &TimelineView) {
        self.current_index = view.current_index;
        self.state = DerivedState {
            tiles: view.tiles.clone(),
            paths: view.paths.clone(),
            heat: view.heat.clone(),
        };
    }

    // ── Projections ────────────────────────────────────────────────

    /// Merged tile values.
    pub fn tiles(&self) -> &TileGrid {
        &self.state.tiles
    }

    /// Path segments in sequence order.
    pub fn paths(&self) -> &[PathTrace] {
        &self.state.paths
    }

    /// Path heat per cell.
    pub fn heat(&self) -> &HeatGrid {
        &self.state.heat
    }

    /// Source bookmarks followed by phase bookmarks.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Bookmarks grouped by source.
    pub fn bookmark_groups(&self) -> Vec<BookmarkGroup> {
        group_bookmarks(&self.bookmarks)
    }

    /// Cursor position.
    pub fn current_index(&self) -> SequenceIndex {
        self.current_index
    }

    /// Largest applied index, or 0 when empty.
    pub fn max_index(&self) -> SequenceIndex {
        self.max_index
    }

    /// All applied records, sorted by sequence index.
    pub fn entries(&self) -> &[EditRecord] {
        &self.entries
    }

    /// Applied records at `(x, y)` whose index is at or below the cursor.
    pub fn cell_records(&self, x: i32, y: i32) -> Vec<&EditRecord> {
        self.entries
            .iter()
            .filter(|r| r.x == x && r.y == y)
            .filter(|r| r.sequence_index.is_some_and(|i| i <= self.current_index))
            .collect()
    }

    /// Owned snapshot of every projection.
    pub fn view(&self) -> TimelineView {
        TimelineView::from_state(
            self.state.clone(),
            self.bookmarks.clone(),
            self.current_index,
            self.max_index,
        )
    }

    /// Metrics from the most recent batch, scrub, or clear.
    pub fn metrics(&self) -> &ReplayMetrics {
        &self.metrics
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The tile catalog generators run against.
    pub fn catalog(&self) -> &dyn TileCatalog {
        self.catalog.as_ref()
    }

    /// The session's sequence allocator.
    pub fn sequence(&self) -> &SequenceAllocator {
        &self.sequence
    }

    /// Mutable access to the allocator, for building batches outside
    /// [`run_generator`](Self::run_generator).
    pub fn sequence_mut(&mut self) -> &mut SequenceAllocator {
        &mut self.sequence
    }
}

impl std::fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineEngine")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .field("bookmarks", &self.bookmarks.len())
            .field("current_index", &self.current_index)
            .field("max_index", &self.max_index)
            .field("tiles", &self.state.tiles.len())
            .field("paths", &self.state.paths.len())
            .field("runs", &self.runs)
            .finish()
    }
}
