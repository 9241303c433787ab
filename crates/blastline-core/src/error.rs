//! Error types for catalog lookups.

use crate::id::TileId;

/// Errors from resolving tile ids against a [`TileCatalog`](crate::TileCatalog).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The id is not present in the catalog.
    #[error("unknown tile id {id}")]
    UnknownTile {
        /// The id that failed to resolve.
        id: TileId,
    },
    /// No catalog entry carries the requested key.
    #[error("unknown tile key '{key}'")]
    UnknownKey {
        /// The key that failed to resolve.
        key: String,
    },
}
