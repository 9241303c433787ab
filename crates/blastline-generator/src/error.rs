//! Error types for parameter access and generator runs.

use blastline_core::{CatalogError, TileId};

use crate::params::ParamKind;

/// Errors from reading a [`ParamValues`](crate::ParamValues) entry.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// No value is stored under the key.
    #[error("missing parameter '{key}'")]
    Missing {
        /// The requested key.
        key: String,
    },
    /// The stored value has a kind the getter cannot convert.
    #[error("parameter '{key}' is {found}, expected {expected}")]
    WrongKind {
        /// The requested key.
        key: String,
        /// Kind the getter reads.
        expected: ParamKind,
        /// Kind actually stored.
        found: ParamKind,
    },
}

/// Errors that abort a generator run. An aborted run produces no records.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// A parameter could not be read.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// A tile id in the grid or the generator's configuration is not in
    /// the catalog.
    #[error("tile id {id} is not in the catalog")]
    UnknownTile {
        /// The unresolved id.
        id: TileId,
    },
    /// A tile key in the generator's configuration is not in the catalog.
    #[error("tile key '{key}' is not in the catalog")]
    UnknownTileKey {
        /// The unresolved key.
        key: String,
    },
    /// A parameter value is out of range.
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParam {
        /// The offending key.
        key: String,
        /// What is wrong with the value.
        reason: String,
    },
}

impl From<CatalogError> for GeneratorError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownTile { id } => Self::UnknownTile { id },
            CatalogError::UnknownKey { key } => Self::UnknownTileKey { key },
        }
    }
}

impl GeneratorError {
    /// Shorthand for [`GeneratorError::InvalidParam`].
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
