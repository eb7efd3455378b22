//! Persistence and change history for a library of books.
//!
//! A [`Session`] loads the library from a single storage slot, applies edits,
//! and writes the whole library back after every change. While a book is
//! open, [`AutoBackup`] watches for the user going idle and snapshots the
//! book into its history. Whole-library backups go through [`transfer`].

pub mod activity;
pub mod autosave;
pub mod clock;
pub mod codec;
pub mod error;
mod history;
mod session;
pub mod status;
pub mod transfer;

pub use crate::activity::ActivityTracker;
pub use crate::autosave::{AutoBackup, SharedSession};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::codec::Codec;
pub use crate::session::{ChapterRemoval, Session, Settings};
pub use crate::status::BackupStatus;
pub use crate::transfer::Import;
