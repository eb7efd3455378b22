//! Whole-library export and import.
//!
//! Exports are pretty-printed `{"books": [...]}` documents carrying every
//! book with its full history. Importing is two steps: [`parse_import`]
//! validates the input without touching anything, and
//! [`Session::import_all`] replaces the library wholesale once the caller
//! has confirmed.

use crate::codec::{BOOKS_KEY, books_from_values, take_books};
use crate::error::{ErrorKind, Result};
use crate::session::Session;
use exn::ResultExt;
use quire_model::{Book, Library, Timestamp};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

const EXPORT_PREFIX: &str = "book-author-backup";

#[derive(Serialize)]
struct ExportRecord<'a> {
    books: Vec<&'a Book>,
}

/// Serialize every book, ordered by id so repeated exports diff cleanly.
pub fn export(library: &Library) -> Result<Vec<u8>> {
    let record = ExportRecord { books: library.books().collect() };
    serde_json::to_vec_pretty(&record).or_raise(|| ErrorKind::Encode)
}

/// `book-author-backup-YYYY-MM-DD.json` for the day of `now` (UTC).
pub fn export_file_name(now: Timestamp) -> String {
    match now.date() {
        Some(date) => format!("{EXPORT_PREFIX}-{date}.json"),
        None => format!("{EXPORT_PREFIX}.json"),
    }
}

/// A validated import, ready to replace the library.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    library: Library,
    skipped: usize,
}
impl Import {
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Number of books that will be imported.
    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    /// Entries in the input that will not be imported: anything without an
    /// id, and all but the last of any duplicate ids.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Validate exported bytes.
///
/// Input that is not JSON, or whose books do not decode, fails with
/// [`ErrorKind::Decode`]. JSON without a `books` array fails with
/// [`ErrorKind::InvalidFormat`].
pub fn parse_import(bytes: &[u8]) -> Result<Import> {
    let value: Value = serde_json::from_slice(bytes).or_raise(|| ErrorKind::Decode)?;
    let Value::Object(mut record) = value else {
        exn::bail!(ErrorKind::InvalidFormat);
    };
    if !matches!(record.get(BOOKS_KEY), Some(Value::Array(_))) {
        exn::bail!(ErrorKind::InvalidFormat);
    }
    let values = take_books(&mut record);
    let total = values.len();
    let library = Library::from_books(books_from_values(values)?);
    let skipped = total - library.len();
    if skipped > 0 {
        warn!(skipped, "Some books in the import will be skipped");
    }
    Ok(Import { library, skipped })
}

impl Session {
    pub fn export_all(&self) -> Result<Vec<u8>> {
        export(&self.library)
    }

    /// Write an export into `dir` under today's file name.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(export_file_name(self.clock.now()));
        let bytes = self.export_all()?;
        fs::write(&path, bytes).or_raise(|| ErrorKind::Export(path.clone()))?;
        info!(path = %path.display(), books = self.library.len(), "Exported library");
        Ok(path)
    }

    /// Read and validate an export file. An unreadable file is a decode
    /// failure, like malformed contents.
    pub fn read_import(path: &Path) -> Result<Import> {
        let bytes = fs::read(path).or_raise(|| ErrorKind::Decode)?;
        parse_import(&bytes)
    }

    /// Replace the entire library with an import. Books not in the import
    /// are gone; if the open book is one of them, it is closed.
    pub fn import_all(&mut self, import: Import) -> Result<usize> {
        let count = import.library.len();
        let replaced = self.library.len();
        self.library = import.library;
        if let Some(current) = self.current.take_if(|id| !self.library.contains(id.as_str())) {
            info!(book_id = %current, "Open book was not in the import, closing it");
        }
        self.persist()?;
        info!(books = count, replaced, "Imported library");
        Ok(count)
    }
}
