//! Timeline bookmarks derived from record source identities.
//!
//! Every source key and every `(key, phase)` pair seen in the applied
//! entries gets one bookmark pointing at the latest index it produced.

use blastline_core::{EditRecord, SequenceIndex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether a bookmark marks a whole generator run or one of its phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    /// A generator run, keyed by its source key.
    Source,
    /// A phase within a run, keyed `"<key>:<phase>"`.
    Phase,
}

/// A named jump point on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Unique key: the source key, or `"<key>:<phase>"` for phases.
    pub key: String,
    /// Display label: the source key, or the bare phase name.
    pub label: String,
    /// Latest sequence index produced under this key.
    pub index: SequenceIndex,
    /// Source or phase.
    pub kind: BookmarkKind,
}

/// Phase bookmarks grouped under their source bookmark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkGroup {
    /// The run's bookmark.
    pub source: Bookmark,
    /// Its phases, ascending by index.
    pub phases: Vec<Bookmark>,
}

/// Source bookmarks followed by phase bookmarks, each ascending by index.
///
/// Entries without a source key or a sequence index are ignored.
pub fn compute_bookmarks(entries: &[EditRecord]) -> Vec<Bookmark> {
    let mut sources: IndexMap<String, Bookmark> = IndexMap::new();
    let mut phases: IndexMap<String, Bookmark> = IndexMap::new();

    for entry in entries {
        let (Some(source), Some(index)) = (entry.source.as_ref(), entry.sequence_index) else {
            continue;
        };
        touch(&mut sources, &source.key, &source.key, index, BookmarkKind::Source);
        if let (Some(key), Some(phase)) = (source.phase_key(), source.phase.as_deref()) {
            touch(&mut phases, &key, phase, index, BookmarkKind::Phase);
        }
    }

    let mut sources: Vec<Bookmark> = sources.into_values().collect();
    let mut phases: Vec<Bookmark> = phases.into_values().collect();
    sources.sort_by_key(|b| b.index);
    phases.sort_by_key(|b| b.index);
    sources.extend(phases);
    sources
}

/// Group a [`compute_bookmarks`] result by source.
///
/// Groups keep the order of their source bookmarks.
pub fn group_bookmarks(bookmarks: &[Bookmark]) -> Vec<BookmarkGroup> {
    let mut groups: IndexMap<&str, BookmarkGroup> = bookmarks
        .iter()
        .filter(|b| b.kind == BookmarkKind::Source)
        .map(|b| {
            (
                b.key.as_str(),
                BookmarkGroup {
                    source: b.clone(),
                    phases: Vec::new(),
                },
            )
        })
        .collect();
    for phase in bookmarks.iter().filter(|b| b.kind == BookmarkKind::Phase) {
        let owner = phase
            .key
            .strip_suffix(phase.label.as_str())
            .and_then(|k| k.strip_suffix(':'));
        if let Some(group) = owner.and_then(|k| groups.get_mut(k)) {
            group.phases.push(phase.clone());
        }
    }
    groups.into_values().collect()
}

fn touch(
    map: &mut IndexMap<String, Bookmark>,
    key: &str,
    label: &str,
    index: SequenceIndex,
    kind: BookmarkKind,
) {
    map.entry(key.to_string())
        .and_modify(|b| b.index = b.index.max(index))
        .or_insert_with(|| Bookmark {
            key: key.to_string(),
            label: label.to_string(),
            index,
            kind,
        });
}
