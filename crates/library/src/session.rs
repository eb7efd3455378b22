//! Library store.
//!
//! A [`Session`] owns the in-memory library and the book currently open for
//! editing. Every mutating operation writes the whole library back through the
//! [`Codec`] before returning and marks user activity, which is what arms the
//! idle-triggered history capture.

use crate::activity::ActivityTracker;
use crate::clock::{Clock, SystemClock};
use crate::codec::Codec;
use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use quire_config::{AutosaveConfig, Config};
use quire_model::{Book, Chapter, ChapterField, Id, Library};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tuning for a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub idle_threshold: Duration,
    pub poll_interval: Duration,
    pub history_limit: usize,
}
impl Default for Settings {
    fn default() -> Self {
        Self::from(&AutosaveConfig::default())
    }
}
impl From<&AutosaveConfig> for Settings {
    fn from(config: &AutosaveConfig) -> Self {
        Self {
            idle_threshold: config.idle_threshold(),
            poll_interval: config.poll_interval(),
            history_limit: config.history_limit,
        }
    }
}

/// Outcome of [`Session::delete_chapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterRemoval {
    Removed(Chapter),
    /// Refused: a book always keeps at least one chapter.
    LastChapter,
}

pub struct Session {
    pub(crate) library: Library,
    pub(crate) codec: Codec,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) tracker: ActivityTracker,
    pub(crate) current: Option<Id>,
    pub(crate) history_limit: usize,
    poll_interval: Duration,
}

impl Session {
    /// Load the library through `codec` and start with no book open.
    pub fn open(codec: Codec, clock: Arc<dyn Clock>, settings: Settings) -> Result<Self> {
        let library = codec.load()?;
        let now = clock.now();
        info!(books = library.len(), slot = codec.slot(), "Opened library");
        Ok(Self {
            library,
            codec,
            tracker: ActivityTracker::new(settings.idle_threshold, now),
            clock,
            current: None,
            // A capture must survive its own eviction pass.
            history_limit: settings.history_limit.max(1),
            poll_interval: settings.poll_interval,
        })
    }

    /// Validate `config`, then open its slot with the system clock.
    pub fn from_config(config: &Config) -> Result<Self> {
        let config = config.clone().validate().or_raise(|| ErrorKind::Config)?;
        let codec = Codec::from_config(&config)?;
        Self::open(codec, Arc::new(SystemClock), Settings::from(&config.autosave))
    }

    /// Write the library without counting it as user activity.
    pub(crate) fn save(&self) -> Result<()> {
        self.codec.save(&self.library)
    }

    /// Write the library and mark user activity.
    pub(crate) fn persist(&mut self) -> Result<()> {
        self.save()?;
        self.tracker.mark(self.clock.now());
        Ok(())
    }

    pub(crate) fn book_mut(&mut self, id: &str) -> Result<&mut Book> {
        self.library.get_mut(id).ok_or_raise(|| ErrorKind::BookNotFound(id.to_string()))
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.library.get(id)
    }

    pub fn current_book_id(&self) -> Option<&Id> {
        self.current.as_ref()
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.current.as_deref().and_then(|id| self.library.get(id))
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// How often [`AutoBackup`](crate::AutoBackup) should check for idleness.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Books for the library view, most recently edited first.
    pub fn list_books(&self) -> Vec<&Book> {
        self.library.list()
    }

    /// Create an untitled book with one blank chapter and open it.
    pub fn create_book(&mut self) -> Result<Id> {
        let now = self.clock.now();
        let id = Id::generate(now);
        self.library.insert(Book::new(id.clone(), Id::generate(now), now));
        self.persist()?;
        debug!(book_id = %id, "Created book");
        self.edit_book(&id)?;
        Ok(id)
    }

    /// Open a book for editing. Opening counts as an edit.
    pub fn edit_book(&mut self, id: &str) -> Result<()> {
        let now = self.clock.now();
        let book = self.book_mut(id)?;
        book.touch(now);
        let id = book.id.clone();
        self.current = Some(id);
        self.persist()
    }

    pub fn close_book(&mut self) {
        if let Some(id) = self.current.take() {
            debug!(book_id = %id, "Closed book");
        }
    }

    /// Remove a book. Deleting an unknown id changes nothing and writes
    /// nothing.
    pub fn delete_book(&mut self, id: &str) -> Result<Option<Book>> {
        let Some(book) = self.library.remove(id) else {
            return Ok(None);
        };
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.persist()?;
        info!(book_id = %book.id, chapters = book.chapters.len(), "Deleted book");
        Ok(Some(book))
    }

    /// Set the title of the open book verbatim.
    pub fn rename_book(&mut self, id: &str, title: impl Into<String>) -> Result<()> {
        if self.current.as_deref() != Some(id) {
            exn::bail!(ErrorKind::NotOpen(id.to_string()));
        }
        let now = self.clock.now();
        let book = self.book_mut(id)?;
        book.set_title(title);
        book.touch(now);
        self.persist()
    }

    /// Set the title of any book from the library view. Surrounding
    /// whitespace is dropped; an empty result displays as untitled.
    pub fn retitle_book(&mut self, id: &str, title: &str) -> Result<()> {
        let now = self.clock.now();
        let book = self.book_mut(id)?;
        book.set_title(title.trim());
        book.touch(now);
        self.persist()
    }

    /// Append a blank chapter and return its id.
    pub fn add_chapter(&mut self, book_id: &str) -> Result<Id> {
        let now = self.clock.now();
        let chapter_id = Id::generate(now);
        let book = self.book_mut(book_id)?;
        book.chapters.push(Chapter::blank(chapter_id.clone()));
        book.touch(now);
        self.persist()?;
        Ok(chapter_id)
    }

    pub fn delete_chapter(&mut self, book_id: &str, chapter_id: &str) -> Result<ChapterRemoval> {
        let now = self.clock.now();
        let book = self.book_mut(book_id)?;
        if book.chapters.len() <= 1 {
            warn!(book_id, chapter_id, "Refusing to delete the only chapter");
            return Ok(ChapterRemoval::LastChapter);
        }
        let Some(chapter) = book.remove_chapter(chapter_id) else {
            exn::bail!(ErrorKind::ChapterNotFound(book_id.to_string(), chapter_id.to_string()));
        };
        book.touch(now);
        self.persist()?;
        Ok(ChapterRemoval::Removed(chapter))
    }

    pub fn update_chapter_field(
        &mut self,
        book_id: &str,
        chapter_id: &str,
        field: ChapterField,
        value: impl Into<String>,
    ) -> Result<()> {
        let now = self.clock.now();
        let book = self.book_mut(book_id)?;
        let chapter = book
            .chapter_mut(chapter_id)
            .ok_or_raise(|| ErrorKind::ChapterNotFound(book_id.to_string(), chapter_id.to_string()))?;
        chapter.set(field, value);
        book.touch(now);
        self.persist()
    }
}
