//! Core types for the Blastline simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value objects every other crate exchanges: grid positions, tile cell
//! values, the [`EditRecord`] stream model with its source/phase/index
//! identity, the [`TileCatalog`] lookup seam, and the session-scoped
//! [`SequenceAllocator`].

#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod id;
pub mod pos;
pub mod record;
pub mod sequence;
pub mod tile;

pub use catalog::{TileEntry, TileSet};
pub use error::CatalogError;
pub use id::{SequenceIndex, TileId};
pub use pos::{PointF, Position, Side2D};
pub use record::{
    EditAction, EditRecord, EditSource, EndType, NodePos, NodeType, PathData, PathMeta, TileEdit,
};
pub use sequence::SequenceAllocator;
pub use tile::{TileCatalog, TileCell, TileData, TileProps};
