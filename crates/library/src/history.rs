//! Per-book change history.
//!
//! Captures are point-in-time copies of a book's title and chapters. They are
//! taken automatically when the user goes idle, appended to the book's log,
//! and the log is bounded by evicting the oldest entries. Capturing writes the
//! library but is not itself user activity, so it never re-arms the idle
//! timer.

use crate::error::{ErrorKind, Result};
use crate::session::Session;
use exn::OptionExt;
use quire_model::{EntryKind, HistoryEntry, Id};
use tracing::{debug, info, trace};

impl Session {
    /// Snapshot a book into its history.
    ///
    /// Returns `None` without writing when `book_id` is `None` or unknown.
    pub fn capture(&mut self, book_id: Option<&str>) -> Result<Option<Id>> {
        let Some(book_id) = book_id else {
            return Ok(None);
        };
        let now = self.clock.now();
        let limit = self.history_limit;
        let Some(book) = self.library.get_mut(book_id) else {
            debug!(book_id, "Nothing to capture, book is gone");
            return Ok(None);
        };
        let entry = HistoryEntry::new(Id::generate(now), now, book.snapshot(), EntryKind::Auto);
        let entry_id = entry.id.clone();
        let evicted = book.record(entry, limit);
        let kept = book.change_history.len();
        self.save()?;
        debug!(book_id, entry_id = %entry_id, kept, evicted = evicted.len(), "Captured history entry");
        Ok(Some(entry_id))
    }

    /// Snapshot whichever book is open.
    pub fn capture_current(&mut self) -> Result<Option<Id>> {
        let current = self.current.clone();
        self.capture(current.as_deref())
    }

    /// Replace a book's title and chapters with a copy of a history entry.
    /// The history itself is left as it was.
    pub fn restore(&mut self, book_id: &str, entry_id: &str) -> Result<()> {
        let now = self.clock.now();
        let book = self.book_mut(book_id)?;
        let entry = book
            .history_entry(entry_id)
            .ok_or_raise(|| ErrorKind::EntryNotFound(book_id.to_string(), entry_id.to_string()))?;
        let snapshot = entry.data.clone();
        book.apply_snapshot(&snapshot);
        book.touch(now);
        info!(book_id, entry_id, chapters = snapshot.chapters.len(), "Restored history entry");
        self.persist()
    }

    /// Remove one history entry. An unknown entry changes nothing and writes
    /// nothing. Unlike a capture, deleting counts as user activity.
    pub fn delete_history_entry(&mut self, book_id: &str, entry_id: &str) -> Result<Option<HistoryEntry>> {
        let book = self.book_mut(book_id)?;
        let Some(entry) = book.remove_history_entry(entry_id) else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(entry))
    }

    /// History for presentation, newest first.
    pub fn list_history(&self, book_id: &str) -> Result<Vec<&HistoryEntry>> {
        let book = self.library.get(book_id).ok_or_raise(|| ErrorKind::BookNotFound(book_id.to_string()))?;
        Ok(book.history_newest_first())
    }

    /// Capture the open book if the user has been idle long enough since
    /// their last edit. Called periodically by
    /// [`AutoBackup`](crate::autosave::AutoBackup).
    pub fn check_idle(&mut self) -> Result<Option<Id>> {
        let now = self.clock.now();
        if !self.tracker.take_due(now) {
            trace!(idle = ?self.tracker.idle_for(now), "Not idle");
            return Ok(None);
        }
        self.capture_current()
    }

    /// Restart idle tracking and take an immediate capture of the open book.
    pub fn start_auto_backup(&mut self) -> Result<Option<Id>> {
        let now = self.clock.now();
        self.tracker.reset(now);
        self.capture_current()
    }
}
