//! Rectangle fill used to seed maps before running blasts.

use blastline_core::{EditRecord, Position, TileCell, TileEdit, TileId};
use blastline_generator::{GenContext, Generator, GeneratorError, ParamSpec, ParamValues};
use serde::{Deserialize, Serialize};

use crate::radius::int_coord;

/// One candidate tile of a [`BoxFill`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileChance {
    /// Tile to place.
    pub id: TileId,
    /// Pick this tile when a draw exceeds `rate`. The last entry is the
    /// fallback and its rate is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl TileChance {
    /// A fallback entry with no rate.
    pub fn always(id: TileId) -> Self {
        Self { id, rate: None }
    }

    /// An entry picked when a draw exceeds `rate`.
    pub fn with_rate(id: TileId, rate: f64) -> Self {
        Self {
            id,
            rate: Some(rate),
        }
    }
}

/// Fills a rectangle with tiles drawn from a chance list.
///
/// An empty chance list fills with the catalog's air tile.
#[derive(Clone, Debug, Default)]
pub struct BoxFill {
    chances: Vec<TileChance>,
}

/// Builder for [`BoxFill`].
pub struct BoxFillBuilder {
    chances: Vec<TileChance>,
}

impl BoxFill {
    /// Create a new builder with an empty chance list.
    pub fn builder() -> BoxFillBuilder {
        BoxFillBuilder {
            chances: Vec::new(),
        }
    }

    /// The configured chance list.
    pub fn chances(&self) -> &[TileChance] {
        &self.chances
    }

    fn pick(&self, air: TileId, mut random: impl FnMut() -> f64) -> TileId {
        let Some((last, rest)) = self.chances.split_last() else {
            return air;
        };
        for entry in rest {
            if let Some(rate) = entry.rate {
                if random() > rate {
                    return entry.id;
                }
            }
        }
        last.id
    }
}

impl BoxFillBuilder {
    /// Append a candidate tile.
    pub fn tile(mut self, chance: TileChance) -> Self {
        self.chances.push(chance);
        self
    }

    /// Build the generator.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any rate is outside `[0, 1]`.
    pub fn build(self) -> Result<BoxFill, String> {
        for chance in &self.chances {
            if let Some(rate) = chance.rate {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(format!(
                        "rate for tile {} must be within [0, 1], got {rate}",
                        chance.id
                    ));
                }
            }
        }
        Ok(BoxFill {
            chances: self.chances,
        })
    }
}

impl Generator for BoxFill {
    fn id(&self) -> &str {
        "random:fill.box"
    }

    fn description(&self) -> &str {
        "Fills a rectangle with tiles picked from a weighted list"
    }

    fn source_prefix(&self) -> &str {
        "box"
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::int("x", "X", 0),
            ParamSpec::int("y", "Y", 0),
            ParamSpec::int("width", "Width", 5),
            ParamSpec::int("height", "Height", 5),
        ]
    }

    fn run(&self, ctx: &mut GenContext<'_>, params: &ParamValues) -> Result<(), GeneratorError> {
        let x0 = int_coord(params.get_int("x")?, "x")?;
        let y0 = int_coord(params.get_int("y")?, "y")?;
        let width = int_coord(params.get_int("width")?, "width")?;
        let height = int_coord(params.get_int("height")?, "height")?;
        if width < 0 || height < 0 {
            return Err(GeneratorError::invalid(
                "width",
                format!("size must be non-negative, got {width}x{height}"),
            ));
        }
        for chance in &self.chances {
            ctx.props(chance.id)?;
        }

        let air = ctx.catalog().air();
        for x in x0..x0 + width {
            for y in y0..y0 + height {
                let tile = self.pick(air, || ctx.random());
                let pos = Position::new(x, y);
                let old = ctx.grid().get_at(pos).cloned();
                let edit = TileEdit::replace(TileCell::tile(tile)).observed(old);
                ctx.emit(Some("fill"), EditRecord::at(pos).edit(edit));
            }
        }
        Ok(())
    }
}
