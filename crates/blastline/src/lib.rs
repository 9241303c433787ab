//! Blastline: timeline-driven blast and path simulation with scrubbable replay.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Blastline sub-crates. For most users, adding `blastline` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use blastline::prelude::*;
//! use blastline::generators::{BoxFill, EnergyRaytraceBlast, TileChance};
//!
//! let tiles = TileSet::standard();
//! let stone = tiles.id_of("minecraft:stone").unwrap();
//! let mut engine = TimelineEngine::new(EngineConfig::default(), Arc::new(tiles)).unwrap();
//!
//! // Seed a 16×16 stone floor, then blow a hole in it.
//! let floor = BoxFill::builder().tile(TileChance::always(stone)).build().unwrap();
//! let size = ParamValues::new().with("width", 16i64).with("height", 16i64);
//! engine.run_generator(&floor, &size, 0).unwrap();
//! engine.run_generator(&EnergyRaytraceBlast, &ParamValues::new(), 1).unwrap();
//!
//! // Scrub back to the end of the floor fill.
//! engine.select_index(SequenceIndex(255));
//! assert_eq!(engine.tiles().len(), 256);
//! assert!(engine.tiles().iter().all(|(_, cell)| cell.tile_id == Some(stone)));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `blastline-core` | Positions, tile cells, edit records, tile catalog |
//! | [`grid`] | `blastline-grid` | Sparse grids, bounds, edit logs |
//! | [`generator`] | `blastline-generator` | Generator trait, parameters, run context |
//! | [`generators`] | `blastline-generators` | Reference blasts, path expansion, box fill |
//! | [`engine`] | `blastline-engine` | Timeline engine, merge policies, scrub worker |
//! | [`replay`] | `blastline-replay` | View hashing and determinism checks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`blastline-core`).
///
/// Contains [`types::Position`], [`types::TileCell`], the
/// [`types::EditRecord`] stream model, and the [`types::TileCatalog`] seam.
pub use blastline_core as types;

/// Sparse grid storage (`blastline-grid`).
pub use blastline_grid as grid;

/// Generator trait and execution context (`blastline-generator`).
///
/// The [`generator::Generator`] trait is the main extension point for
/// user-defined edit producers.
pub use blastline_generator as generator;

/// Reference generators (`blastline-generators`).
///
/// Includes [`generators::EnergyRaytraceBlast`], [`generators::RadiusBlast`],
/// [`generators::PathExpansion`], and the rest of [`generators::library`].
pub use blastline_generators as generators;

/// Timeline engine and background scrubbing (`blastline-engine`).
///
/// [`engine::TimelineEngine`] for synchronous use,
/// [`engine::ScrubWorker`] to scrub on a background thread.
pub use blastline_engine as engine;

/// Replay determinism checks (`blastline-replay`).
pub use blastline_replay as replay;

/// Common imports for typical Blastline usage.
///
/// ```rust
/// use blastline::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use blastline_core::{
        EditAction, EditRecord, EditSource, PathData, Position, SequenceIndex, TileCatalog,
        TileCell, TileData, TileId, TileSet,
    };

    // Grids
    pub use blastline_grid::{Bounds, EditLog, HeatGrid, TileGrid};

    // Generators
    pub use blastline_generator::{Generator, GeneratorError, ParamValues};

    // Engine
    pub use blastline_engine::{
        EngineConfig, MergePolicy, ScrubConfig, ScrubWorker, TimelineEngine, TimelineView,
    };
}
