//! Benchmark profiles and utilities for the Blastline simulation framework.
//!
//! Provides pre-built timelines for benchmarking and examples:
//!
//! - [`reference_timeline`]: 64x64 floor (4K cells) with two blasts and a flood
//! - [`stress_timeline`]: 200x200 floor (40K cells) with the same runs scaled up
//! - [`floor`]: the bare mixed dirt/stone grid generators run against

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use blastline_core::{TileCell, TileSet};
use blastline_engine::{EngineConfig, TimelineEngine};
use blastline_generator::ParamValues;
use blastline_generators::{BoxFill, EnergyRaytraceBlast, PathExpansion, RadiusBlast, TileChance};
use blastline_grid::TileGrid;

/// A `side x side` grid at the origin, stone with a dirt checkerboard.
pub fn floor(tiles: &TileSet, side: i32) -> TileGrid {
    let stone = tiles.id_of("minecraft:stone").unwrap();
    let dirt = tiles.id_of("minecraft:dirt").unwrap();
    let mut grid = TileGrid::new();
    for y in 0..side {
        for x in 0..side {
            let id = if (x + y) % 2 == 0 { stone } else { dirt };
            grid.set(x, y, TileCell::tile(id));
        }
    }
    grid
}

/// Build a reference timeline: 64x64 floor (4K cells).
///
/// Runs: BoxFill(dirt 0.5, stone) → TNT(16 rays/axis, energy 12) →
/// Antimatter(size 10) → BFS flood(depth 24).
pub fn reference_timeline(seed: u64) -> TimelineEngine {
    timeline(seed, 64)
}

/// Build a stress timeline: 200x200 floor (40K cells).
///
/// Same runs as [`reference_timeline`], with blast sizes and flood depth
/// scaled to the larger floor.
pub fn stress_timeline(seed: u64) -> TimelineEngine {
    timeline(seed, 200)
}

fn timeline(seed: u64, side: i64) -> TimelineEngine {
    let tiles = TileSet::standard();
    let stone = tiles.id_of("minecraft:stone").unwrap();
    let dirt = tiles.id_of("minecraft:dirt").unwrap();
    let mut engine = TimelineEngine::new(EngineConfig::default(), Arc::new(tiles)).unwrap();

    let fill = BoxFill::builder()
        .tile(TileChance::with_rate(dirt, 0.5))
        .tile(TileChance::always(stone))
        .build()
        .unwrap();
    let size = ParamValues::new()
        .with("width", side)
        .with("height", side);
    engine.run_generator(&fill, &size, seed).unwrap();

    let center = side as f64 / 2.0;
    let scale = side as f64 / 64.0;
    let tnt = ParamValues::new()
        .with("x", center + 0.5)
        .with("y", center + 0.5)
        .with("energy", 12.0 * scale)
        .with("randomize", true);
    engine.run_generator(&EnergyRaytraceBlast, &tnt, seed.wrapping_add(1)).unwrap();

    let crater = ParamValues::new()
        .with("x", side / 4)
        .with("y", side / 4)
        .with("size", 10.0 * scale);
    engine.run_generator(&RadiusBlast, &crater, seed.wrapping_add(2)).unwrap();

    let flood = ParamValues::new()
        .with("x", side / 2)
        .with("y", side / 2)
        .with("maxDepth", (24.0 * scale) as i64);
    engine.run_generator(&PathExpansion::breadth_first(), &flood, seed.wrapping_add(3)).unwrap();

    engine
}
