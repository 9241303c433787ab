//! Radius replacement blast (antimatter style).
//!
//! Every cell inside the feathered radius is replaced with the void tile.
//! Removal edits are emitted nearest first, loose tiles (fluids and
//! gravity tiles) before solids.

use blastline_core::{EditRecord, EndType, NodeType, PathData, Position, TileCell, TileEdit};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};

use crate::sweep::{check_radius, reach, sweep, Feather};

/// A cell queued for removal.
struct Doomed {
    pos: Position,
    distance_sq: i64,
    loose: bool,
    old: Option<TileCell>,
}

/// Antimatter-style replacement blast.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadiusBlast;

impl Generator for RadiusBlast {
    fn id(&self) -> &str {
        "icbmclassic:blast.antimatter@1.12.2-6.4.1"
    }

    fn description(&self) -> &str {
        "Replaces every tile within the radius with void, sorted by distance with a feathered edge"
    }

    fn source_prefix(&self) -> &str {
        "Antimatter"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::int("x", "X", 56),
            ParamSpec::int("y", "Y", 56),
            ParamSpec::float("size", "Size", 55.0),
            ParamSpec::float("feathering", "Feathering", 0.05),
        ]
    }

    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError> {
        let center = Position::new(
            int_coord(params.get_int("x")?, "x")?,
            int_coord(params.get_int("y")?, "y")?,
        );
        let size = params.get_float("size")?;
        let feathering = params.get_float("feathering")?;
        check_radius(center, size, feathering)?;

        let feather = Feather::new(size, feathering);
        let void = ctx.catalog().void();
        let mut doomed = Vec::new();

        sweep(center, reach(size), |cell| {
            let hit = feather.affects(cell.distance_sq, || ctx.random());
            if hit {
                let (_, props) = ctx.tile_props_at(cell.pos)?;
                doomed.push(Doomed {
                    pos: cell.pos,
                    distance_sq: cell.distance_sq,
                    loose: props.is_loose(),
                    old: ctx.grid().get_at(cell.pos).cloned(),
                });
            }
            let node = if hit { NodeType::Action } else { NodeType::Ignore };
            let path = PathData::segment(cell.start, cell.end)
                .end_type(EndType::Continue)
                .node_type(node);
            ctx.emit(Some(cell.phase.as_str()), EditRecord::at(cell.pos).path(path));
            Ok(())
        })?;

        doomed.sort_by_key(|d| d.distance_sq);
        for (phase, loose) in [("fluids", true), ("solid", false)] {
            for d in doomed.iter().filter(|d| d.loose == loose) {
                let edit = TileEdit::replace(TileCell::tile(void)).observed(d.old.clone());
                ctx.emit(Some(phase), EditRecord::at(d.pos).edit(edit));
            }
        }
        tracing::debug!(cells = doomed.len(), "radius blast removals queued");
        Ok(())
    }
}

pub(crate) fn int_coord(value: i64, key: &str) -> Result<i32, GeneratorError> {
    i32::try_from(value)
        .map_err(|_| GeneratorError::invalid(key, format!("{value} is out of range")))
}
