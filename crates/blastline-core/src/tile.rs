//! Tile cell values and the catalog lookup seam.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::id::TileId;

/// Attribute data carried by a tile.
///
/// Every field is optional: absence means "not recorded", which is
/// distinct from an explicit zero. The merge reducer relies on that
/// distinction, so new attributes must be added here and in the merge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Facing direction, `0..=3` matching [`Side2D::ALL`](crate::Side2D::ALL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<u8>,
    /// Electrical power energy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_power: Option<f64>,
    /// Thermal energy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_heat: Option<f64>,
}

/// The value of one cell in a tile grid.
///
/// `tile_id == None` after a merge means no tile change was recorded
/// for the cell; readers treat it as air. It is not the same thing as
/// an explicit air tile id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileCell {
    /// Tile type placed in the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_id: Option<TileId>,
    /// Attribute data for the tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TileData>,
}

impl TileCell {
    /// A cell holding `id` with no attribute data.
    pub fn tile(id: TileId) -> Self {
        Self {
            tile_id: Some(id),
            data: None,
        }
    }

    /// An attribute-only value with no tile id.
    pub fn attributes(data: TileData) -> Self {
        Self {
            tile_id: None,
            data: Some(data),
        }
    }

    /// Attach attribute data.
    pub fn with_data(mut self, data: TileData) -> Self {
        self.data = Some(data);
        self
    }

    /// Recorded energy power, if any.
    pub fn energy_power(&self) -> Option<f64> {
        self.data.as_ref().and_then(|d| d.energy_power)
    }
}

/// Static physical properties of a tile type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileProps {
    /// Blast resistance. Raytracers divide this by 5 to get an energy cost.
    pub resistance: f64,
    /// Hardness. Negative hardness marks an unbreakable tile.
    pub hardness: f64,
    /// Liquid tiles are removed before solids by replacement blasts.
    pub is_fluid: bool,
    /// Gravity-affected tiles (sand) are grouped with fluids.
    pub is_gravity: bool,
}

impl TileProps {
    /// Energy cost for a ray to pass through this tile, before scaling.
    pub fn explosive_resistance(&self) -> f64 {
        self.resistance / 5.0
    }

    /// Whether removal ordering treats this tile as loose (fluid or gravity).
    pub fn is_loose(&self) -> bool {
        self.is_fluid || self.is_gravity
    }

    /// Whether the tile can be destroyed at all.
    pub fn is_breakable(&self) -> bool {
        self.hardness >= 0.0
    }
}

/// Read-only lookup from tile id to physical properties.
///
/// Provided by the embedding application; the core never validates ids
/// itself. Generators surface a miss as an error rather than ignoring it.
pub trait TileCatalog: Send + Sync {
    /// Properties for `id`, or `None` if the id is unknown.
    fn resolve(&self, id: TileId) -> Option<TileProps>;

    /// Id of the air tile. Absent grid cells read as this tile.
    fn air(&self) -> TileId;

    /// Id of the void tile placed by replacement blasts.
    fn void(&self) -> TileId;

    /// Like [`resolve`](Self::resolve) but with a typed error on a miss.
    fn require(&self, id: TileId) -> Result<TileProps, CatalogError> {
        self.resolve(id).ok_or(CatalogError::UnknownTile { id })
    }
}
