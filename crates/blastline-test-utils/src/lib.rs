//! Test fixtures and record builders for Blastline development.
//!
//! Provides the standard tile ids resolved against
//! [`TileSet::standard`](blastline_core::TileSet::standard), grid builders
//! for seeding generator input, and terse constructors for hand-written edit
//! records.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;
