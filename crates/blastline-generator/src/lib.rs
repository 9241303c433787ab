//! Generator trait and execution context for Blastline simulations.
//!
//! Generators read the current tile grid through a [`GenContext`] and
//! emit a self-contained [`EditLog`]. They are stateless; all run state
//! (random source, phase counters, output) lives in the context.

#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod generator;
pub mod params;

pub use context::GenContext;
pub use error::{GeneratorError, ParamError};
pub use generator::{Generator, GeneratorInfo};
pub use params::{ParamKind, ParamSpec, ParamValue, ParamValues};

use blastline_core::{SequenceAllocator, TileCatalog};
use blastline_grid::{EditLog, TileGrid};

/// Run `generator` once and return its records.
///
/// Missing `params` entries fall back to the generator's schema defaults.
/// If the run fails, `sequence` is restored so the aborted run leaves no
/// gap in the index stream.
pub fn run_generator(
    generator: &dyn Generator,
    grid: &TileGrid,
    catalog: &dyn TileCatalog,
    sequence: &mut SequenceAllocator,
    source_key: &str,
    params: &ParamValues,
    seed: u64,
) -> Result<EditLog, GeneratorError> {
    let values = ParamValues::defaults(&generator.params()).merged(params);
    let checkpoint = sequence.clone();
    let mut ctx = GenContext::new(grid, catalog, sequence, source_key, seed);
    match generator.run(&mut ctx, &values) {
        Ok(()) => {
            let log = ctx.into_edit_log();
            tracing::info!(
                generator = generator.id(),
                source = source_key,
                records = log.record_count(),
                cells = log.cell_count(),
                "generator run complete"
            );
            Ok(log)
        }
        Err(e) => {
            drop(ctx);
            *sequence = checkpoint;
            tracing::warn!(
                generator = generator.id(),
                source = source_key,
                error = %e,
                "generator run aborted"
            );
            Err(e)
        }
    }
}
