//! Energy-limited raytrace blast, modelled on a TNT explosion.
//!
//! Rays leave the centre along the edge slices of a `raysPerAxis²`
//! direction square (optionally normalised to a circle). Each ray walks
//! in fixed sub-cell steps, paying a resistance cost once per new cell
//! and a fixed cost per step, and removes breakable tiles while it still
//! has energy left after paying for them.

use blastline_core::{
    EditRecord, EndType, NodeType, PathData, PointF, Position, TileCell, TileEdit,
};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};

use crate::limits::check_non_negative;

/// Tuning for one raytrace run, read from [`ParamValues`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaytraceSettings {
    /// Blast centre.
    pub origin: PointF,
    /// Rays per axis of the direction square.
    pub rays_per_axis: u32,
    /// Starting energy of each ray.
    pub energy: f64,
    /// Jitter each ray's energy by `0.7 + rand * 0.6`.
    pub randomize: bool,
    /// Normalise directions to unit length.
    pub normalize: bool,
    /// Distance travelled per step.
    pub step_size: f64,
    /// Energy spent per step.
    pub step_energy: f64,
    /// Flat cost added to every tile's resistance cost.
    pub min_energy_cost: f64,
    /// Multiplier applied to the tile cost.
    pub scale_energy_cost: f64,
}

impl RaytraceSettings {
    /// Read and validate settings from `params`.
    pub fn from_params(params: &ParamValues) -> Result<Self, GeneratorError> {
        let rays = params.get_int("raysPerAxis")?;
        if rays < 2 {
            return Err(GeneratorError::invalid(
                "raysPerAxis",
                format!("must be >= 2, got {rays}"),
            ));
        }
        let settings = Self {
            origin: PointF::new(params.get_float("x")?, params.get_float("y")?),
            rays_per_axis: u32::try_from(rays)
                .map_err(|_| GeneratorError::invalid("raysPerAxis", "too large"))?,
            energy: params.get_float("energy")?,
            randomize: params.get_bool("randomize")?,
            normalize: params.get_bool("normalize")?,
            step_size: params.get_float("stepSize")?,
            step_energy: params.get_float("stepEnergy")?,
            min_energy_cost: params.get_float("minEnergyCost")?,
            scale_energy_cost: params.get_float("scaleEnergyCost")?,
        };
        for (key, value) in [
            ("stepSize", settings.step_size),
            ("stepEnergy", settings.step_energy),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeneratorError::invalid(
                    key,
                    format!("must be finite and > 0, got {value}"),
                ));
            }
        }
        check_non_negative("energy", settings.energy)?;
        check_non_negative("minEnergyCost", settings.min_energy_cost)?;
        check_non_negative("scaleEnergyCost", settings.scale_energy_cost)?;
        Ok(settings)
    }

    /// Unit-square edge directions, in ray order.
    pub fn directions(&self) -> Vec<(f64, f64)> {
        let n = self.rays_per_axis;
        let span = f64::from(n - 1);
        let mut out = Vec::new();
        for xs in 0..n {
            for ys in 0..n {
                if xs != 0 && xs != n - 1 && ys != 0 && ys != n - 1 {
                    continue;
                }
                let mut dx = f64::from(xs) / span * 2.0 - 1.0;
                let mut dy = f64::from(ys) / span * 2.0 - 1.0;
                let magnitude = (dx * dx + dy * dy).sqrt();
                if self.normalize && magnitude > 0.0 {
                    dx /= magnitude;
                    dy /= magnitude;
                }
                out.push((dx, dy));
            }
        }
        out
    }
}

/// Minecraft-style TNT blast.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyRaytraceBlast;

impl Generator for EnergyRaytraceBlast {
    fn id(&self) -> &str {
        "minecraft:tnt"
    }

    fn description(&self) -> &str {
        "TNT blast using energy-limited raytraces along the edges of a direction square"
    }

    fn source_prefix(&self) -> &str {
        "TNT"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::float("x", "X", 7.5),
            ParamSpec::float("y", "Y", 7.5),
            ParamSpec::int("raysPerAxis", "Rays per axis", 16),
            ParamSpec::float("energy", "Energy", 6.0),
            ParamSpec::boolean("randomize", "Randomize energy", false),
            ParamSpec::boolean("normalize", "Normalize rays", true),
            ParamSpec::float("stepSize", "Step size", 0.3),
            ParamSpec::float("stepEnergy", "Step energy", 0.225),
            ParamSpec::float("minEnergyCost", "Min energy cost", 0.3),
            ParamSpec::float("scaleEnergyCost", "Energy cost scale", 0.3),
        ]
    }

    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError> {
        let settings = RaytraceSettings::from_params(params)?;
        let air = ctx.catalog().air();

        for (ray, (dx, dy)) in settings.directions().into_iter().enumerate() {
            let phase = format!("ray-{ray}");
            let mut energy = settings.energy;
            if settings.randomize {
                energy *= 0.7 + ctx.random() * 0.6;
            }

            let mut point = settings.origin;
            let mut last_cell: Option<Position> = None;
            while energy > 0.0 {
                let next = point.offset(dx * settings.step_size, dy * settings.step_size);
                let cell = next.cell();
                let mut cost = 0.0;
                let mut edit = None;

                if last_cell != Some(cell) {
                    last_cell = Some(cell);
                    let (tile, props) = ctx.tile_props_at(cell)?;
                    cost = (props.explosive_resistance() + settings.min_energy_cost)
                        * settings.scale_energy_cost;
                    energy -= cost;
                    if energy >= 0.0 && tile != air && props.is_breakable() {
                        let old = ctx.grid().get_at(cell).cloned();
                        edit = Some(TileEdit::replace(TileCell::tile(air)).observed(old));
                    }
                }

                let end_type = if energy - settings.step_energy <= 0.0 {
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
                        .energy(energy, cost)
                        .node_type(node_type)
                        .end_type(end_type),
                );
                record.edit = edit;
                ctx.emit(Some(phase.as_str()), record);

                energy -= settings.step_energy;
                point = next;
            }
        }
        Ok(())
    }
}
