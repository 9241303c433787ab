//! Determinism checks: two fresh engines fed the same generator runs with
//! the same seeds must agree at every run boundary.

use std::sync::Arc;

use blastline_core::{SequenceIndex, TileCell, TileId, TileSet};
use blastline_engine::{EngineConfig, TimelineEngine, TimelineView};
use blastline_generator::ParamValues;
use blastline_generators::{BoxFill, EnergyRaytraceBlast, PathExpansion, RadiusBlast, TileChance};
use blastline_replay::{
    compare_views, record_checkpoints, verify_checkpoints, view_hash, Checkpoint, Divergence,
    ReplayError,
};
use blastline_test_utils::standard;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn engine() -> TimelineEngine {
    TimelineEngine::new(EngineConfig::default(), Arc::new(TileSet::standard())).unwrap()
}

/// A randomized floor, a TNT blast, a feathered radius blast, and a flood.
fn session(seed: u64) -> TimelineEngine {
    let (_, ids) = standard();
    let mut e = engine();
    let floor = BoxFill::builder()
        .tile(TileChance::with_rate(ids.sand, 0.3))
        .tile(TileChance::with_rate(ids.dirt, 0.5))
        .tile(TileChance::always(ids.stone))
        .build()
        .unwrap();
    let size = ParamValues::new().with("width", 20i64).with("height", 20i64);
    e.run_generator(&floor, &size, seed).unwrap();
    let tnt = ParamValues::new()
        .with("raysPerAxis", 8i64)
        .with("randomize", true);
    e.run_generator(&EnergyRaytraceBlast, &tnt, seed + 1).unwrap();
    let radius = ParamValues::new()
        .with("x", 10i64)
        .with("y", 10i64)
        .with("size", 5.0)
        .with("feathering", 0.4);
    e.run_generator(&RadiusBlast, &radius, seed + 2).unwrap();
    let flood = ParamValues::new().with("maxDepth", 5i64);
    e.run_generator(&PathExpansion::breadth_first(), &flood, seed + 3)
        .unwrap();
    e
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn same_seed_sessions_agree_at_every_checkpoint() {
    let a = session(11);
    let b = session(11);
    let checkpoints = record_checkpoints(&a);
    assert_eq!(checkpoints.len(), 4);
    assert_eq!(checkpoints, record_checkpoints(&b));
    assert_eq!(verify_checkpoints(&b, &checkpoints), Ok(()));
}

#[test]
fn checkpoints_do_not_move_the_cursor() {
    let e = session(5);
    let before = e.view();
    let _ = record_checkpoints(&e);
    assert_eq!(e.view(), before);
}

#[test]
fn final_checkpoint_matches_live_view() {
    let e = session(5);
    let checkpoints = record_checkpoints(&e);
    let last = checkpoints.last().unwrap();
    assert_eq!(last.index, e.max_index());
    assert_eq!(last.hash, view_hash(&e.view()));
}

#[test]
fn different_seed_is_detected() {
    let a = session(11);
    let b = session(12);
    let checkpoints = record_checkpoints(&a);
    let err = verify_checkpoints(&b, &checkpoints);
    assert!(matches!(
        err,
        Err(ReplayError::HashMismatch { .. }) | Err(ReplayError::BeyondTimeline { .. })
    ));
}

#[test]
fn checkpoint_past_the_end_is_rejected() {
    let e = session(3);
    let past = SequenceIndex(e.max_index().0 + 10);
    let err = verify_checkpoints(&e, &[Checkpoint { index: past, hash: 0 }]);
    assert_eq!(
        err,
        Err(ReplayError::BeyondTimeline {
            index: past,
            max_index: e.max_index(),
        })
    );
}

#[test]
fn empty_engine_has_no_checkpoints() {
    assert!(record_checkpoints(&engine()).is_empty());
}

#[test]
fn divergent_floors_report_tile_cells() {
    let (_, ids) = standard();
    let mut a = engine();
    let mut b = engine();
    let size = ParamValues::new().with("width", 3i64).with("height", 3i64);
    let stone = BoxFill::builder()
        .tile(TileChance::always(ids.stone))
        .build()
        .unwrap();
    let sand = BoxFill::builder()
        .tile(TileChance::always(ids.sand))
        .build()
        .unwrap();
    a.run_generator(&stone, &size, 0).unwrap();
    b.run_generator(&sand, &size, 0).unwrap();

    let report = compare_views(&a.view(), &b.view()).unwrap();
    assert_eq!(report.index, a.current_index());
    assert_eq!(report.divergences.len(), 9);
    assert!(report.divergences.iter().all(|d| matches!(
        d,
        Divergence::Tile { recorded: Some(r), replayed: Some(p), .. }
            if *r == TileCell::tile(ids.stone) && *p == TileCell::tile(ids.sand)
    )));
}

#[test]
fn scrubbed_engine_compares_equal_to_replay() {
    let mut e = session(21);
    let mid = SequenceIndex(e.max_index().0 / 2);
    e.select_index(mid);
    let replayed = e.replay_to(mid, &|| false).unwrap();
    assert!(compare_views(&e.view(), &replayed).is_none());
}

#[test]
fn checkpoints_round_trip_through_json() {
    let checkpoints = record_checkpoints(&session(8));
    let json = serde_json::to_string(&checkpoints).unwrap();
    let back: Vec<Checkpoint> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, checkpoints);
}

// ── Properties ──────────────────────────────────────────────────

fn view_of(cells: &[(i32, i32, u32)]) -> TimelineView {
    let mut view = TimelineView::default();
    for &(x, y, id) in cells {
        view.tiles.set(x, y, TileCell::tile(TileId(id)));
    }
    view
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn any_seed_replays_to_its_own_checkpoints(seed in 0u64..1_000_000) {
        let checkpoints = record_checkpoints(&session(seed));
        prop_assert!(!checkpoints.is_empty());
        prop_assert_eq!(verify_checkpoints(&session(seed), &checkpoints), Ok(()));
    }
}

proptest! {
    #[test]
    fn view_hash_ignores_insertion_order(
        cells in prop::collection::btree_map((-40i32..40, -40i32..40), 0u32..6, 0..40),
    ) {
        let forward: Vec<(i32, i32, u32)> = cells.iter().map(|(&(x, y), &id)| (x, y, id)).collect();
        let mut backward = forward.clone();
        backward.reverse();
        let (a, b) = (view_of(&forward), view_of(&backward));
        prop_assert_eq!(view_hash(&a), view_hash(&b));
        prop_assert!(compare_views(&a, &b).is_none());
    }
}
