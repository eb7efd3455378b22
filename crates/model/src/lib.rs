//! Data model for a quire library.
//!
//! A [`Library`] maps book identifiers to [`Book`]s. Each book owns an
//! ordered list of [`Chapter`]s and a bounded log of [`HistoryEntry`]
//! snapshots. Every type here serializes to the JSON shape used both by the
//! durable library record and by exported backups, so field names follow
//! that format (`lastEdited`, `changeHistory`, ...) rather than Rust naming.

mod book;
mod chapter;
mod history;
mod id;
mod library;
mod timestamp;

pub use self::book::{Book, UNTITLED};
pub use self::chapter::{Chapter, ChapterField};
pub use self::history::{EntryKind, HistoryEntry, Snapshot};
pub use self::id::Id;
pub use self::library::Library;
pub use self::timestamp::Timestamp;
