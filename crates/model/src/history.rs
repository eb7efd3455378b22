use crate::{Chapter, Id, Timestamp};
use serde::{Deserialize, Serialize};

/// The captured part of a book: its title and chapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

/// What produced a [`HistoryEntry`].
///
/// Only [`Auto`](Self::Auto) entries are created today; `manual` is accepted
/// on decode so records from a manual-capture path still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Auto,
    Manual,
}

/// An immutable point-in-time copy of a book's title and chapters.
///
/// Entries own their [`Snapshot`] outright; nothing in the live book aliases
/// it. The only way to get one is [`HistoryEntry::new`], and there are no
/// mutating methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub id: Id,
    pub timestamp: Timestamp,
    pub data: Snapshot,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}
impl HistoryEntry {
    pub fn new(id: Id, timestamp: Timestamp, data: Snapshot, kind: EntryKind) -> Self {
        Self { id, timestamp, data, kind }
    }

    pub fn chapter_count(&self) -> usize {
        self.data.chapters.len()
    }
}
