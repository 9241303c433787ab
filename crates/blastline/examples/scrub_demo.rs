//! End-to-end scrub example.
//!
//! Demonstrates: seed a floor → run blasts and a path flood → hand the
//! engine to a scrub worker → jump between bookmarks → verify the final
//! state replays identically.
//!
//! Run with `RUST_LOG=debug` to see per-batch merge metrics.

use std::sync::Arc;

use blastline::generators::{BoxFill, EnergyRaytraceBlast, PathExpansion, RadiusBlast, TileChance};
use blastline::prelude::*;
use blastline::replay::{record_checkpoints, verify_checkpoints};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let tiles = TileSet::standard();
    let stone = tiles.id_of("minecraft:stone").ok_or("standard set has no stone")?;
    let dirt = tiles.id_of("minecraft:dirt").ok_or("standard set has no dirt")?;
    let mut engine = TimelineEngine::new(EngineConfig::default(), Arc::new(tiles))?;

    // --- Build a timeline ---
    let floor = BoxFill::builder()
        .tile(TileChance::with_rate(dirt, 0.4))
        .tile(TileChance::always(stone))
        .build()?;
    let size = ParamValues::new().with("width", 24i64).with("height", 24i64);
    engine.run_generator(&floor, &size, 7)?;

    let tnt = ParamValues::new()
        .with("x", 8.5)
        .with("y", 8.5)
        .with("randomize", true);
    engine.run_generator(&EnergyRaytraceBlast, &tnt, 8)?;

    let crater = ParamValues::new()
        .with("x", 17i64)
        .with("y", 16i64)
        .with("size", 4.0);
    engine.run_generator(&RadiusBlast, &crater, 9)?;

    let flood = ParamValues::new()
        .with("x", 8i64)
        .with("y", 8i64)
        .with("maxDepth", 12i64);
    engine.run_generator(&PathExpansion::breadth_first(), &flood, 10)?;

    info!(
        records = engine.entries().len(),
        max_index = %engine.max_index(),
        "timeline built"
    );
    let checkpoints = record_checkpoints(&engine);
    let groups = engine.bookmark_groups();

    // --- Scrub on a background thread ---
    let worker = ScrubWorker::spawn(engine, ScrubConfig::default())?;
    for group in &groups {
        for bookmark in std::iter::once(&group.source).chain(&group.phases) {
            worker.select(bookmark.index)?;
        }
    }
    worker.wait_idle()?;

    for group in &groups {
        worker.select(group.source.index)?;
        worker.wait_idle()?;
        let view = worker.latest();
        info!(
            run = %group.source.label,
            index = %view.current_index,
            tiles = view.tiles.len(),
            paths = view.paths.len(),
            phases = group.phases.len(),
            "scrubbed to end of run"
        );
    }

    let stats = worker.stats();
    info!(
        requests = stats.requests,
        replays = stats.replays,
        dropped = stats.dropped,
        cancelled = stats.cancelled,
        "scrub stats"
    );

    // --- Verify determinism ---
    let engine = worker.shutdown()?;
    verify_checkpoints(&engine, &checkpoints)?;
    info!(checkpoints = checkpoints.len(), "replay verified");
    Ok(())
}
