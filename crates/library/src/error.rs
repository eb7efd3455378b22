//! Library Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Storage, codec and config failures are raised as
//! children of the kind that describes what the caller was trying to do.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("book not found: {_0}")]
    BookNotFound(#[error(not(source))] String),
    #[display("chapter {_1} not found in book {_0}")]
    ChapterNotFound(#[error(not(source))] String, #[error(not(source))] String),
    #[display("history entry {_1} not found in book {_0}")]
    EntryNotFound(#[error(not(source))] String, #[error(not(source))] String),
    /// The operation only applies to the book currently open for editing.
    #[display("book is not open for editing: {_0}")]
    NotOpen(#[error(not(source))] String),
    /// Import input parsed, but has no `books` array.
    #[display("invalid backup file format")]
    InvalidFormat,
    #[display("could not decode library record")]
    Decode,
    #[display("could not encode library record")]
    Encode,
    #[display("could not write export file: {}", _0.display())]
    Export(#[error(not(source))] PathBuf),
    #[display("storage backend failure")]
    Storage,
    #[display("invalid configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage | Self::Export(_))
    }
}
