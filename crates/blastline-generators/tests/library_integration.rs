use std::collections::{HashMap, HashSet};

use blastline_core::{EditAction, EndType, NodeType, Position, SequenceAllocator, TileId};
use blastline_generator::{run_generator, Generator, GeneratorError, ParamValues};
use blastline_generators::{
    find, library, BoxFill, EmpBlast, EnergyRaytraceBlast, LargeBlast, PathExpansion, RadiusBlast,
    TileChance,
};
use blastline_grid::{EditLog, TileGrid};
use blastline_test_utils::{
    edit_count, fill, filled_grid, in_sequence, path_count, powered, standard,
};

fn run(generator: &dyn Generator, grid: &TileGrid, params: ParamValues, seed: u64) -> EditLog {
    let (catalog, _) = standard();
    let mut seq = SequenceAllocator::new();
    let key = format!("{}-0", generator.source_prefix());
    run_generator(generator, grid, &catalog, &mut seq, &key, &params, seed).unwrap()
}

/// Run with fresh state and return the failure plus how many indices were
/// handed out before it.
fn run_err(generator: &dyn Generator, params: ParamValues) -> (GeneratorError, u64) {
    let (catalog, _) = standard();
    let mut seq = SequenceAllocator::new();
    let err = run_generator(generator, &TileGrid::new(), &catalog, &mut seq, "X-0", &params, 0)
        .unwrap_err();
    (err, seq.peek().0)
}

fn invalid_key(err: &GeneratorError) -> &str {
    match err {
        GeneratorError::InvalidParam { key, .. } => key,
        other => panic!("expected InvalidParam, got {other:?}"),
    }
}

fn records_per_phase(log: &EditLog) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for r in log.records() {
        let phase = r.source.as_ref().and_then(|s| s.phase.clone()).unwrap();
        *counts.entry(phase).or_insert(0) += 1;
    }
    counts
}

// ── Energy raytrace ────────────────────────────────────────────────

#[test]
fn raytrace_on_air_emits_fixed_steps_per_ray_and_no_edits() {
    let params = ParamValues::new()
        .with("energy", 6.0)
        .with("stepEnergy", 0.225)
        .with("minEnergyCost", 0.0)
        .with("scaleEnergyCost", 0.0);
    let log = run(&EnergyRaytraceBlast, &TileGrid::new(), params, 0);

    let expected = (6.0f64 / 0.225).floor() as usize + 1;
    assert_eq!(expected, 27);
    let per_ray = records_per_phase(&log);
    assert_eq!(per_ray.len(), 60);
    assert!(per_ray.values().all(|n| *n == expected));
    assert_eq!(edit_count(&log), 0);
    assert_eq!(path_count(&log), 60 * expected);
}

#[test]
fn raytrace_marks_the_last_step_of_each_ray_done() {
    let params = ParamValues::new().with("raysPerAxis", 2i64);
    let log = run(&EnergyRaytraceBlast, &TileGrid::new(), params, 0);
    let mut last: HashMap<String, (u64, EndType)> = HashMap::new();
    for r in in_sequence(&log) {
        let phase = r.source.clone().unwrap().phase.unwrap();
        let end = r.path.as_ref().unwrap().meta.end_type();
        last.insert(phase, (r.sequence_index.unwrap().0, end));
    }
    assert_eq!(last.len(), 4);
    assert!(last.values().all(|(_, end)| *end == EndType::Done));
}

#[test]
fn raytrace_breaks_soft_tiles_near_the_centre() {
    let (_, ids) = standard();
    let grid = filled_grid(ids.dirt, 0, 0, 16, 16);
    let log = run(&EnergyRaytraceBlast, &grid, ParamValues::new(), 0);
    assert!(edit_count(&log) > 0);
    for r in log.records().filter(|r| r.has_tile_edit()) {
        let edit = r.edit.as_ref().unwrap();
        assert_eq!(edit.new_value.tile_id, Some(ids.air));
        assert_eq!(edit.old_value.as_ref().and_then(|c| c.tile_id), Some(ids.dirt));
        assert_eq!(r.path.as_ref().unwrap().meta.node_type, Some(NodeType::Action));
    }
    assert!(log.cell(7, 7).iter().any(|r| r.has_tile_edit()));
}

#[test]
fn randomized_raytrace_is_deterministic_for_a_seed() {
    let (_, ids) = standard();
    let grid = filled_grid(ids.stone, 0, 0, 16, 16);
    let params = ParamValues::new().with("randomize", true);
    let a = run(&EnergyRaytraceBlast, &grid, params.clone(), 99);
    let b = run(&EnergyRaytraceBlast, &grid, params.clone(), 99);
    let c = run(&EnergyRaytraceBlast, &grid, params, 100);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn unknown_tile_aborts_the_run() {
    let mut grid = TileGrid::new();
    grid.set(7, 7, blastline_core::TileCell::tile(TileId(999)));
    let (catalog, _) = standard();
    let mut seq = SequenceAllocator::new();
    let err = run_generator(
        &EnergyRaytraceBlast,
        &grid,
        &catalog,
        &mut seq,
        "TNT-0",
        &ParamValues::new(),
        0,
    )
    .unwrap_err();
    assert_eq!(err, GeneratorError::UnknownTile { id: TileId(999) });
    assert_eq!(seq.peek().0, 0);
}

#[test]
fn raytrace_rejects_infinite_energy() {
    let params = ParamValues::new()
        .with("raysPerAxis", 2i64)
        .with("energy", f64::INFINITY);
    let (err, used) = run_err(&EnergyRaytraceBlast, params);
    assert_eq!(invalid_key(&err), "energy");
    assert_eq!(used, 0);
}

// ── Large blast ────────────────────────────────────────────────────

#[test]
fn large_blast_stays_within_its_size() {
    let params = ParamValues::new().with("size", 6.0).with("energy", 1000.0);
    let log = run(&LargeBlast, &TileGrid::new(), params, 3);
    let origin = blastline_core::PointF::new(7.5, 7.5);
    for r in log.records() {
        let path = r.path.as_ref().unwrap();
        assert!(path.start.distance(origin) <= 6.0 + 1e-9);
    }
    assert_eq!(records_per_phase(&log).len(), 2 * LargeBlast::slices(6.0) as usize);
}

#[test]
fn large_blast_rejects_unbounded_size_and_energy() {
    let (err, used) = run_err(&LargeBlast, ParamValues::new().with("size", 1e10));
    assert_eq!(invalid_key(&err), "size");
    assert_eq!(used, 0);

    let params = ParamValues::new().with("size", 6.0).with("energy", f64::INFINITY);
    let (err, used) = run_err(&LargeBlast, params);
    assert_eq!(invalid_key(&err), "energy");
    assert_eq!(used, 0);
}

// ── Radius blast ───────────────────────────────────────────────────

#[test]
fn radius_without_feathering_edits_exactly_the_disc() {
    let params = ParamValues::new()
        .with("x", 0i64)
        .with("y", 0i64)
        .with("size", 3.0)
        .with("feathering", 0.0);
    let log = run(&RadiusBlast, &TileGrid::new(), params, 0);

    let disc: HashSet<Position> = (-3..=3)
        .flat_map(|x| (-3..=3).map(move |y| Position::new(x, y)))
        .filter(|p| p.distance_sq(Position::new(0, 0)) <= 9)
        .collect();
    let edited: HashSet<Position> = log
        .records()
        .filter(|r| r.has_tile_edit())
        .map(|r| r.position())
        .collect();
    assert_eq!(edited, disc);
    assert_eq!(edit_count(&log), disc.len());
    assert_eq!(path_count(&log), 49);

    for r in log.records().filter(|r| r.has_path()) {
        let node = r.path.as_ref().unwrap().meta.node_type;
        let expected = if disc.contains(&r.position()) {
            NodeType::Action
        } else {
            NodeType::Ignore
        };
        assert_eq!(node, Some(expected));
    }
}

#[test]
fn radius_removes_loose_tiles_first_then_by_distance() {
    let (_, ids) = standard();
    let mut grid = filled_grid(ids.stone, -4, -4, 9, 9);
    fill(&mut grid, ids.water, 2, 0, 1, 1);
    fill(&mut grid, ids.sand, -1, 0, 1, 1);
    let params = ParamValues::new()
        .with("x", 0i64)
        .with("y", 0i64)
        .with("size", 2.0)
        .with("feathering", 0.0);
    let log = run(&RadiusBlast, &grid, params, 0);

    let edits: Vec<_> = in_sequence(&log)
        .into_iter()
        .filter(|r| r.has_tile_edit())
        .collect();
    let phases: Vec<String> = edits
        .iter()
        .map(|r| r.source.clone().unwrap().phase.unwrap())
        .collect();
    assert_eq!(&phases[..2], &["fluids".to_string(), "fluids".to_string()]);
    assert!(phases[2..].iter().all(|p| p == "solid"));
    // sand (d² = 1) before water (d² = 4)
    assert_eq!(edits[0].position(), Position::new(-1, 0));
    assert_eq!(edits[1].position(), Position::new(2, 0));

    let solid_d2: Vec<i64> = edits[2..]
        .iter()
        .map(|r| r.position().distance_sq(Position::new(0, 0)))
        .collect();
    assert!(solid_d2.windows(2).all(|w| w[0] <= w[1]));
    assert!(edits
        .iter()
        .all(|r| r.edit.as_ref().unwrap().new_value.tile_id == Some(ids.void)));
}

#[test]
fn feathered_radius_never_reaches_past_the_edge() {
    let params = ParamValues::new()
        .with("x", 0i64)
        .with("y", 0i64)
        .with("size", 10.0)
        .with("feathering", 0.5);
    let log = run(&RadiusBlast, &TileGrid::new(), params, 5);
    for r in log.records().filter(|r| r.has_tile_edit()) {
        assert!(r.position().distance_sq(Position::new(0, 0)) <= 100);
    }
    // cells well inside the inner edge are always removed
    assert!(log.cell(0, 0).iter().any(|r| r.has_tile_edit()));
}

#[test]
fn radius_rejects_sizes_that_would_overflow_the_sweep() {
    let (err, used) = run_err(&RadiusBlast, ParamValues::new().with("size", 1e10));
    assert_eq!(invalid_key(&err), "size");
    assert_eq!(used, 0);

    let params = ParamValues::new()
        .with("x", i64::from(i32::MAX))
        .with("y", 0i64)
        .with("size", 4.0);
    let (err, used) = run_err(&RadiusBlast, params);
    assert_eq!(invalid_key(&err), "x");
    assert_eq!(used, 0);
}

// ── EMP ────────────────────────────────────────────────────────────

#[test]
fn emp_substitutes_table_hits_and_drains_other_power() {
    let (_, ids) = standard();
    let mut grid = TileGrid::new();
    grid.set(0, 0, powered(ids.stone, 40.0));
    grid.set(1, 0, powered(ids.dirt, 12.0));
    grid.set(2, 0, blastline_core::TileCell::tile(ids.grass));
    let emp = EmpBlast::builder()
        .replace(ids.stone, ids.cobble)
        .build()
        .unwrap();
    let params = ParamValues::new()
        .with("x", 0i64)
        .with("y", 0i64)
        .with("size", 3.0);
    let log = run(&emp, &grid, params, 0);

    let at = |x, y| log.cell(x, y)[0].clone();

    let swapped = at(0, 0).edit.unwrap();
    assert_eq!(swapped.new_value.tile_id, Some(ids.cobble));
    assert_eq!(swapped.action, EditAction::Override);

    let drained = at(1, 0).edit.unwrap();
    assert_eq!(drained.new_value.tile_id, None);
    assert_eq!(drained.new_value.energy_power(), Some(0.0));
    assert_eq!(drained.old_value.unwrap().energy_power(), Some(12.0));

    let untouched = at(2, 0);
    assert!(untouched.edit.is_none());
    assert_eq!(untouched.path.unwrap().meta.node_type, Some(NodeType::Ignore));
    assert_eq!(edit_count(&log), 2);
}

#[test]
fn emp_table_with_unknown_tile_is_rejected() {
    let (_, ids) = standard();
    let emp = EmpBlast::builder()
        .replace(ids.stone, TileId(4000))
        .build()
        .unwrap();
    let (catalog, _) = standard();
    let mut seq = SequenceAllocator::new();
    let err = run_generator(
        &emp,
        &TileGrid::new(),
        &catalog,
        &mut seq,
        "EMP-0",
        &ParamValues::new(),
        0,
    )
    .unwrap_err();
    assert_eq!(err, GeneratorError::UnknownTile { id: TileId(4000) });
}

// ── Path expansion ─────────────────────────────────────────────────

#[test]
fn expansion_terminates_with_path_records_only() {
    for expansion in [PathExpansion::depth_first(), PathExpansion::breadth_first()] {
        let params = ParamValues::new()
            .with("x", 0i64)
            .with("y", 0i64)
            .with("maxDepth", 4i64);
        let log = run(&expansion, &TileGrid::new(), params, 0);
        assert_eq!(edit_count(&log), 0);
        assert!(log
            .records()
            .all(|r| r.source.as_ref().unwrap().phase.as_deref() == Some("pathing")));
        for r in log.records() {
            assert!(r.position().manhattan(Position::new(0, 0)) <= 4);
        }

        let queued: Vec<Position> = log
            .records()
            .filter(|r| r.path.as_ref().unwrap().meta.end_type() == EndType::Continue)
            .map(|r| r.position())
            .collect();
        let unique: HashSet<Position> = queued.iter().copied().collect();
        assert_eq!(queued.len(), unique.len());

        let ends: HashSet<EndType> = log
            .records()
            .map(|r| r.path.as_ref().unwrap().meta.end_type())
            .collect();
        assert!(ends.contains(&EndType::Collision));
        assert!(ends.contains(&EndType::Done));
    }
}

#[test]
fn expansion_at_depth_one_stops_after_the_origin() {
    let params = ParamValues::new()
        .with("x", 3i64)
        .with("y", 3i64)
        .with("maxDepth", 1i64);
    let log = run(&PathExpansion::breadth_first(), &TileGrid::new(), params, 0);
    let cells: Vec<Position> = in_sequence(&log).iter().map(|r| r.position()).collect();
    assert_eq!(
        cells,
        vec![
            Position::new(3, 2),
            Position::new(3, 4),
            Position::new(2, 3),
            Position::new(4, 3),
        ]
    );
    assert!(log
        .records()
        .all(|r| r.path.as_ref().unwrap().meta.end_type() == EndType::Done));
}

// ── Box fill ───────────────────────────────────────────────────────

#[test]
fn box_fill_places_one_edit_per_cell() {
    let (_, ids) = standard();
    let fill = BoxFill::builder()
        .tile(TileChance::with_rate(ids.sand, 0.5))
        .tile(TileChance::always(ids.stone))
        .build()
        .unwrap();
    let params = ParamValues::new()
        .with("x", -1i64)
        .with("y", 2i64)
        .with("width", 4i64)
        .with("height", 3i64);
    let log = run(&fill, &TileGrid::new(), params, 11);
    assert_eq!(edit_count(&log), 12);
    assert_eq!(log.cell_count(), 12);
    for r in log.records() {
        let id = r.edit.as_ref().unwrap().new_value.tile_id.unwrap();
        assert!(id == ids.sand || id == ids.stone);
    }
    assert_eq!(log.bounds().start, Position::new(-1, 0));
}

#[test]
fn default_box_fill_is_air() {
    let (_, ids) = standard();
    let log = run(&BoxFill::default(), &TileGrid::new(), ParamValues::new(), 0);
    assert_eq!(edit_count(&log), 25);
    assert!(log
        .records()
        .all(|r| r.edit.as_ref().unwrap().new_value.tile_id == Some(ids.air)));
}

// ── Library ────────────────────────────────────────────────────────

#[test]
fn library_ids_are_unique_and_findable() {
    let all = library();
    assert_eq!(all.len(), 7);
    let ids: HashSet<String> = all.iter().map(|g| g.id().to_string()).collect();
    assert_eq!(ids.len(), 7);
    assert_eq!(find("minecraft:tnt").unwrap().source_prefix(), "TNT");
    assert!(find("nope").is_none());
}

#[test]
fn every_library_generator_runs_with_defaults() {
    let (_, ids) = standard();
    let grid = filled_grid(ids.dirt, 0, 0, 12, 12);
    for generator in library() {
        let log = run(generator.as_ref(), &grid, ParamValues::new(), 1);
        assert!(!log.is_empty(), "{} produced nothing", generator.id());
    }
}
