//! Electromagnetic pulse blast.
//!
//! Sweeps the same feathered radius as [`RadiusBlast`](crate::RadiusBlast)
//! but never removes tiles. A cell whose tile appears in the replacement
//! table is swapped for its output tile; otherwise a cell carrying stored
//! power has that power zeroed and keeps its tile.
//!
//! Constructed via the builder pattern: [`EmpBlast::builder`].

use blastline_core::{
    EditRecord, EndType, NodeType, PathData, Position, TileCatalog, TileCell, TileData, TileEdit,
    TileId,
};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};
use indexmap::IndexMap;

use crate::radius::int_coord;
use crate::sweep::{check_radius, reach, sweep, Feather};

/// EMP blast with an input → output tile replacement table.
#[derive(Clone, Debug, Default)]
pub struct EmpBlast {
    replacements: IndexMap<TileId, TileId>,
}

/// Builder for [`EmpBlast`].
pub struct EmpBlastBuilder {
    replacements: IndexMap<TileId, TileId>,
}

impl EmpBlast {
    /// Create a new builder with an empty replacement table.
    pub fn builder() -> EmpBlastBuilder {
        EmpBlastBuilder {
            replacements: IndexMap::new(),
        }
    }

    /// Output tile for `input`, if the table has one.
    pub fn replacement(&self, input: TileId) -> Option<TileId> {
        self.replacements.get(&input).copied()
    }

    fn check_table(&self, catalog: &dyn TileCatalog) -> Result<(), GeneratorError> {
        for (input, output) in &self.replacements {
            catalog.require(*input)?;
            catalog.require(*output)?;
        }
        Ok(())
    }
}

impl EmpBlastBuilder {
    /// Replace `input` tiles with `output` tiles.
    pub fn replace(mut self, input: TileId, output: TileId) -> Self {
        self.replacements.insert(input, output);
        self
    }

    /// Build the generator.
    ///
    /// # Errors
    ///
    /// Returns `Err` if an entry maps a tile to itself.
    pub fn build(self) -> Result<EmpBlast, String> {
        if let Some((id, _)) = self.replacements.iter().find(|(i, o)| i == o) {
            return Err(format!("replacement for tile {id} maps it to itself"));
        }
        Ok(EmpBlast {
            replacements: self.replacements,
        })
    }
}

impl Generator for EmpBlast {
    fn id(&self) -> &str {
        "icbmclassic:blast.emp@1.12.2-6.4.1"
    }

    fn description(&self) -> &str {
        "EMP swaps tiles through a replacement table or drains stored power inside the radius"
    }

    fn source_prefix(&self) -> &str {
        "EMP"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::int("x", "X", 56),
            ParamSpec::int("y", "Y", 56),
            ParamSpec::float("size", "Size", 50.0),
            ParamSpec::float("feathering", "Feathering", 0.0),
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
        self.check_table(ctx.catalog())?;

        let feather = Feather::new(size, feathering);
        sweep(center, reach(size), |cell| {
            let mut edit = None;
            if feather.affects(cell.distance_sq, || ctx.random()) {
                let (tile, _) = ctx.tile_props_at(cell.pos)?;
                let old = ctx.grid().get_at(cell.pos).cloned();
                if let Some(output) = self.replacement(tile) {
                    edit = Some(TileEdit::replace(TileCell::tile(output)).observed(old));
                } else if old.as_ref().and_then(TileCell::energy_power).is_some() {
                    let drained = TileCell::attributes(TileData {
                        energy_power: Some(0.0),
                        ..TileData::default()
                    });
                    edit = Some(TileEdit::replace(drained).observed(old));
                }
            }
            let node = if edit.is_some() {
                NodeType::Action
            } else {
                NodeType::Ignore
            };
            let mut record = EditRecord::at(cell.pos).path(
                PathData::segment(cell.start, cell.end)
                    .end_type(EndType::Continue)
                    .node_type(node),
            );
            record.edit = edit;
            ctx.emit(Some(cell.phase.as_str()), record);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_identity_mapping() {
        assert!(EmpBlast::builder().replace(TileId(3), TileId(3)).build().is_err());
        let emp = EmpBlast::builder()
            .replace(TileId(3), TileId(4))
            .build()
            .unwrap();
        assert_eq!(emp.replacement(TileId(3)), Some(TileId(4)));
        assert_eq!(emp.replacement(TileId(4)), None);
    }
}
