//! Yaw-slice raytrace used by large (nuclear) blasts.
//!
//! Ray count scales with the blast size so that adjacent rays stay about
//! one cell apart at the rim. Every ray pays a constant cost per step and
//! each distinct cell's explosive resistance once.

use std::f64::consts::PI;

use blastline_core::{EditRecord, EndType, NodeType, PathData, PointF, Position, TileCell, TileEdit};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};

use crate::limits::{check_non_negative, check_size};

const STEP_SIZE: f64 = 0.5;
const STEP_COST: f64 = 0.3 * 0.75 * 5.0;
const LINE_DENSITY_SCALE: u32 = 2;

/// Large blast raytracer.
#[derive(Clone, Copy, Debug, Default)]
pub struct LargeBlast;

impl LargeBlast {
    /// Number of yaw slices covering half a turn for a blast of `size`.
    ///
    /// Saturates for sizes beyond [`MAX_BLAST_SIZE`](crate::MAX_BLAST_SIZE),
    /// which runs reject.
    pub fn slices(size: f64) -> u32 {
        (PI / (1.0 / size).atan()).ceil() as u32
    }
}

impl Generator for LargeBlast {
    fn id(&self) -> &str {
        "icbmclassic:blast.nuclear@1.12.2-6.4.1"
    }

    fn description(&self) -> &str {
        "Nuclear configuration using the yaw-slice 'blast large' raytracer"
    }

    fn source_prefix(&self) -> &str {
        "BlastLarge"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::float("x", "X", 7.5),
            ParamSpec::float("y", "Y", 7.5),
            ParamSpec::float("size", "Size", 50.0),
            ParamSpec::float("energy", "Energy", 80.0),
        ]
    }

    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError> {
        let origin = PointF::new(params.get_float("x")?, params.get_float("y")?);
        let size = params.get_float("size")?;
        let energy = params.get_float("energy")?;
        check_size("size", size)?;
        if size == 0.0 {
            return Err(GeneratorError::invalid("size", "must be > 0"));
        }
        check_non_negative("energy", energy)?;
        let air = ctx.catalog().air();

        let steps = Self::slices(size);
        for ray in 0..LINE_DENSITY_SCALE * steps {
            let yaw = PI / f64::from(steps) * f64::from(ray);
            let (dx, dy) = (yaw.cos() * STEP_SIZE, yaw.sin() * STEP_SIZE);
            let phase = format!("ray-{ray}");

            let mut power = energy - energy * ctx.random() / 2.0;
            let mut point = origin;
            let mut last_cell: Option<Position> = None;

            while power > 0.0 && point.distance(origin) <= size {
                let cell = point.cell();
                power -= STEP_COST;

                let mut cost = 0.0;
                let mut edit = None;
                if last_cell != Some(cell) {
                    last_cell = Some(cell);
                    let (tile, props) = ctx.tile_props_at(cell)?;
                    cost = props.explosive_resistance();
                    if tile != air && props.is_breakable() && power - cost >= 0.0 {
                        let old = ctx.grid().get_at(cell).cloned();
                        edit = Some(TileEdit::replace(TileCell::tile(air)).observed(old));
                    }
                }

                let next = point.offset(dx, dy);
                let left = power - cost;
                let end_type = if left <= 0.0 || next.distance(origin) > size {
                    EndType::Done
                } else {
                    EndType::Continue
                };
                let node_type = if edit.is_some() {
                    NodeType::Action
                } else {
                    NodeType::Hit
                };
                let mut record = EditRecord::at(cell).path(
                    PathData::segment(point, next)
                        .energy(left, cost)
                        .node_type(node_type)
                        .end_type(end_type),
                );
                record.edit = edit;
                ctx.emit(Some(phase.as_str()), record);

                power = left;
                point = next;
            }
        }
        Ok(())
    }
}
