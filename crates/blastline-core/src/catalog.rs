//! A table-backed [`TileCatalog`] and the built-in standard tile set.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::id::TileId;
use crate::tile::{TileCatalog, TileProps};

/// One row of a [`TileSet`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileEntry {
    /// Namespaced key, e.g. `minecraft:stone`.
    pub key: String,
    /// Physical properties.
    pub props: TileProps,
}

/// Raw row used to build a [`TileSet`] before normalisation.
struct RawTile {
    key: &'static str,
    resistance: Option<f64>,
    hardness: f64,
    is_fluid: bool,
    is_gravity: bool,
}

const STANDARD_TILES: &[RawTile] = &[
    raw("void", None, 0.0, false, false),
    raw("minecraft:air", None, 0.0, false, false),
    raw("minecraft:stone", Some(10.0), 1.5, false, false),
    raw("minecraft:grass", None, 0.6, false, false),
    raw("minecraft:dirt", None, 0.5, false, false),
    raw("minecraft:sand", None, 0.5, false, true),
    raw("minecraft:cobble", Some(10.0), 2.0, false, false),
    raw("minecraft:plank", Some(5.0), 2.0, false, false),
    raw("minecraft:water", None, 100.0, true, false),
    raw("minecraft:lava", None, 100.0, true, false),
];

const fn raw(
    key: &'static str,
    resistance: Option<f64>,
    hardness: f64,
    is_fluid: bool,
    is_gravity: bool,
) -> RawTile {
    RawTile {
        key,
        resistance,
        hardness,
        is_fluid,
        is_gravity,
    }
}

/// Catalog backed by a vector of entries; a tile's id is its index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileSet {
    entries: Vec<TileEntry>,
    air: TileId,
    void: TileId,
}

impl TileSet {
    /// Build a catalog from entries, locating air and void by key.
    pub fn new(
        entries: Vec<TileEntry>,
        air_key: &str,
        void_key: &str,
    ) -> Result<Self, CatalogError> {
        let find = |key: &str| {
            entries
                .iter()
                .position(|e| e.key == key)
                .map(|i| TileId(i as u32))
                .ok_or_else(|| CatalogError::UnknownKey { key: key.to_string() })
        };
        let air = find(air_key)?;
        let void = find(void_key)?;
        Ok(Self { entries, air, void })
    }

    /// The built-in tile set.
    ///
    /// Entries are ordered by key, so ids are stable across builds. Tiles
    /// without an explicit resistance derive it as `hardness * 5`;
    /// explicit resistances are scaled by 3.
    pub fn standard() -> Self {
        let mut raw: Vec<&RawTile> = STANDARD_TILES.iter().collect();
        raw.sort_by(|a, b| a.key.cmp(b.key));
        let entries = raw
            .into_iter()
            .map(|t| TileEntry {
                key: t.key.to_string(),
                props: TileProps {
                    resistance: match t.resistance {
                        Some(r) if r != 0.0 => r * 3.0,
                        _ => t.hardness * 5.0,
                    },
                    hardness: t.hardness,
                    is_fluid: t.is_fluid,
                    is_gravity: t.is_gravity,
                },
            })
            .collect();
        let mut set = Self {
            entries,
            air: TileId(0),
            void: TileId(0),
        };
        if let Some(id) = set.id_of("minecraft:air") {
            set.air = id;
        }
        if let Some(id) = set.id_of("void") {
            set.void = id;
        }
        set
    }

    /// Id for `key`, if present.
    pub fn id_of(&self, key: &str) -> Option<TileId> {
        self.entries
            .iter()
            .position(|e| e.key == key)
            .map(|i| TileId(i as u32))
    }

    /// Entry for `id`, if present.
    pub fn entry(&self, id: TileId) -> Option<&TileEntry> {
        self.entries.get(id.0 as usize)
    }

    /// All entries in id order.
    pub fn entries(&self) -> &[TileEntry] {
        &self.entries
    }

    /// Number of tile types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no tiles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TileCatalog for TileSet {
    fn resolve(&self, id: TileId) -> Option<TileProps> {
        self.entry(id).map(|e| e.props)
    }

    fn air(&self) -> TileId {
        self.air
    }

    fn void(&self) -> TileId {
        self.void
    }
}
