//! Event-sourced timeline engine for Blastline simulations.
//!
//! Provides the [`TimelineEngine`] that owns the applied edit stream,
//! merges it into tile, path, and heat projections through the
//! [`MergeReducer`], derives bookmarks, and rebuilds state "as of" any
//! sequence index. [`ScrubWorker`] runs an engine on a background thread
//! and coalesces scrub requests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bookmark;
pub mod config;
pub mod merge;
pub mod metrics;
pub mod scrub;
pub mod timeline;
pub mod view;

pub use bookmark::{compute_bookmarks, group_bookmarks, Bookmark, BookmarkGroup, BookmarkKind};
pub use config::{ConfigError, EngineConfig, ScrubConfig};
pub use merge::{MergePolicy, MergeReducer};
pub use metrics::ReplayMetrics;
pub use scrub::{ScrubError, ScrubStats, ScrubWorker};
pub use timeline::TimelineEngine;
pub use view::{DerivedState, PathTrace, TimelineView};
