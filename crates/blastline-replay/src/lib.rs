//! Replay determinism checks for Blastline timelines.
//!
//! Two sessions fed the same generator runs with the same seeds must
//! derive identical state at every cursor position. This crate hashes
//! derived views so that property can be checked cheaply and, when it
//! fails, reported cell by cell.
//!
//! # Architecture
//!
//! - [`view_hash`] folds a [`TimelineView`](blastline_engine::TimelineView)
//!   into one FNV-1a hash
//! - [`record_checkpoints`] hashes an engine at every run boundary
//! - [`verify_checkpoints`] replays another engine against those hashes
//! - [`compare_views`] reports per-cell differences on a mismatch

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod hash;

pub use compare::{
    compare_views, record_checkpoints, verify_checkpoints, Checkpoint, Divergence,
    DivergenceReport,
};
pub use error::ReplayError;
pub use hash::{heat_hash, path_hash, tile_hash, view_hash};
