use std::sync::Arc;

use blastline_core::{SequenceIndex, TileCell, TileSet};
use blastline_engine::{
    ConfigError, EngineConfig, ScrubConfig, ScrubError, ScrubWorker, TimelineEngine,
};
use blastline_test_utils::{log_of, place, standard, trace};

fn worker() -> ScrubWorker {
    let engine =
        TimelineEngine::new(EngineConfig::default(), Arc::new(TileSet::standard())).unwrap();
    ScrubWorker::spawn(engine, ScrubConfig::default()).unwrap()
}

#[test]
fn initial_view_is_empty() {
    let w = worker();
    let view = w.latest();
    assert!(view.tiles.is_empty());
    assert_eq!(view.max_index, SequenceIndex(0));
}

#[test]
fn batches_publish_in_order() {
    let (_, ids) = standard();
    let w = worker();
    w.apply(log_of([place(0, 0, 0, ids.stone)])).unwrap();
    w.apply(log_of([place(0, 0, 1, ids.dirt)])).unwrap();
    w.wait_idle().unwrap();
    let view = w.latest();
    assert_eq!(view.tiles.get(0, 0), Some(&TileCell::tile(ids.dirt)));
    assert_eq!(view.current_index, SequenceIndex(1));
}

#[test]
fn coalesced_selects_publish_the_latest_request() {
    let (_, ids) = standard();
    let w = worker();
    let records: Vec<_> = (0..200u64)
        .map(|i| place((i % 20) as i32, (i / 20) as i32, i, ids.stone))
        .collect();
    w.apply(log_of(records)).unwrap();

    for i in (0..200u64).rev() {
        w.select(SequenceIndex(i)).unwrap();
    }
    w.select(SequenceIndex(57)).unwrap();
    w.wait_idle().unwrap();

    let view = w.latest();
    assert_eq!(view.current_index, SequenceIndex(57));
    assert_eq!(view.tiles.len(), 58);

    let stats = w.stats();
    assert_eq!(stats.requests, 201);
    assert_eq!(stats.replays + stats.dropped + stats.cancelled, 201);
    assert!(stats.replays >= 1);
}

#[test]
fn apply_after_select_is_never_dropped() {
    let (_, ids) = standard();
    let w = worker();
    w.apply(log_of([place(0, 0, 0, ids.stone), trace(1, 1, 1)])).unwrap();
    w.select(SequenceIndex(0)).unwrap();
    w.apply(log_of([place(2, 2, 2, ids.sand)])).unwrap();
    w.wait_idle().unwrap();

    let view = w.latest();
    assert_eq!(view.current_index, SequenceIndex(2));
    assert_eq!(view.heat.get(1, 1), Some(&1));
    assert_eq!(view.tiles.get(2, 2), Some(&TileCell::tile(ids.sand)));
}

#[test]
fn clear_publishes_an_empty_view() {
    let (_, ids) = standard();
    let w = worker();
    w.apply(log_of([place(0, 0, 0, ids.stone)])).unwrap();
    w.clear().unwrap();
    w.wait_idle().unwrap();
    assert!(w.latest().tiles.is_empty());
}

#[test]
fn shutdown_returns_the_engine() {
    let (_, ids) = standard();
    let w = worker();
    w.apply(log_of([place(0, 0, 0, ids.stone), place(1, 0, 1, ids.stone)]))
        .unwrap();
    w.select(SequenceIndex(0)).unwrap();
    w.wait_idle().unwrap();
    let engine = w.shutdown().unwrap();
    assert_eq!(engine.current_index(), SequenceIndex(0));
    assert_eq!(engine.entries().len(), 2);
    assert!(engine.tiles().get(1, 0).is_none());
}

#[test]
fn zero_capacity_is_rejected() {
    let engine =
        TimelineEngine::new(EngineConfig::default(), Arc::new(TileSet::standard())).unwrap();
    let err = ScrubWorker::spawn(engine, ScrubConfig { channel_capacity: 0 }).err();
    assert_eq!(err, Some(ScrubError::Config(ConfigError::ChannelCapacityZero)));
}
