//! Library record codec.
//!
//! The whole library is stored as one JSON object in a single slot, keyed by
//! book id. Older editors stored `{"books": [...]}` instead; that shape is
//! recognised on load, converted, and written back in the keyed shape
//! straight away so the migration only ever happens once.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use quire_config::{Config, DecodePolicy, StorageConfig};
use quire_model::{Book, Library};
use quire_storage::BackendHandle;
use quire_storage::backend::{LocalBackend, ReadOnlyBackend};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Key holding the book array in the legacy record shape and in exports.
pub(crate) const BOOKS_KEY: &str = "books";

/// Record shapes understood by [`decode`].
#[derive(Debug, PartialEq)]
pub enum Decoded {
    /// Current shape: an object mapping book id to book.
    Keyed(Library),
    /// Legacy shape: `{"books": [...]}`.
    Legacy(Library),
}
impl Decoded {
    pub fn into_library(self) -> Library {
        match self {
            Self::Keyed(library) | Self::Legacy(library) => library,
        }
    }
}

pub struct Codec {
    backend: BackendHandle,
    slot: String,
    policy: DecodePolicy,
}

impl Codec {
    pub fn new(backend: BackendHandle, slot: impl Into<String>, policy: DecodePolicy) -> Self {
        Self { backend, slot: slot.into(), policy }
    }

    /// Codec over a [`LocalBackend`] rooted at the configured directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = backend_from_config(&config.storage)?;
        Ok(Self::new(backend, &config.storage.slot, config.decode_policy))
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Read the library from the slot.
    ///
    /// An absent slot is an empty library. A legacy record is migrated and
    /// persisted before returning. An undecodable record fails under
    /// [`DecodePolicy::Strict`]; under [`DecodePolicy::Lenient`] it is logged
    /// and replaced by an empty library in memory only.
    #[instrument(skip(self), fields(backend = self.backend.name(), slot = %self.slot))]
    pub fn load(&self) -> Result<Library> {
        let Some(bytes) = self.backend.read(&self.slot).or_raise(|| ErrorKind::Storage)? else {
            debug!("Slot is empty, starting with an empty library");
            return Ok(Library::new());
        };
        match decode(&bytes) {
            Ok(Decoded::Keyed(library)) => {
                debug!(books = library.len(), "Loaded library");
                Ok(library)
            },
            Ok(Decoded::Legacy(library)) => {
                info!(books = library.len(), "Migrating legacy library record");
                self.save(&library)?;
                Ok(library)
            },
            Err(err) => match self.policy {
                DecodePolicy::Strict => Err(err),
                DecodePolicy::Lenient => {
                    let kind: &ErrorKind = &err;
                    warn!(error = %kind, bytes = bytes.len(), "Discarding undecodable library record");
                    Ok(Library::new())
                },
            },
        }
    }

    /// Overwrite the slot with the keyed record for `library`.
    #[instrument(level = "trace", skip_all, fields(backend = self.backend.name(), slot = %self.slot))]
    pub fn save(&self, library: &Library) -> Result<()> {
        let bytes = encode(library)?;
        self.backend.write(&self.slot, &bytes).or_raise(|| ErrorKind::Storage)
    }
}

fn backend_from_config(config: &StorageConfig) -> Result<BackendHandle> {
    let local = LocalBackend::new("local", &config.root).or_raise(|| ErrorKind::Storage)?;
    let backend: BackendHandle = match config.read_only {
        true => Arc::new(ReadOnlyBackend::new(Arc::new(local))),
        false => Arc::new(local),
    };
    Ok(backend)
}

pub fn encode(library: &Library) -> Result<Vec<u8>> {
    serde_json::to_vec(library).or_raise(|| ErrorKind::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    let value: Value = serde_json::from_slice(bytes).or_raise(|| ErrorKind::Decode)?;
    let Value::Object(mut record) = value else {
        exn::bail!(ErrorKind::Decode);
    };
    if let Some(Value::Array(_)) = record.get(BOOKS_KEY) {
        let books = take_books(&mut record);
        return Ok(Decoded::Legacy(Library::from_books(books_from_values(books)?)));
    }
    let library = serde_json::from_value(Value::Object(record)).or_raise(|| ErrorKind::Decode)?;
    Ok(Decoded::Keyed(library))
}

/// Remove the `books` array from a record. Anything else under that key is
/// treated as no books at all.
pub(crate) fn take_books(record: &mut Map<String, Value>) -> Vec<Value> {
    match record.remove(BOOKS_KEY) {
        Some(Value::Array(books)) => books,
        _ => Vec::new(),
    }
}

/// Decode book objects, skipping array elements that are not objects. An
/// object with a field of the wrong type fails the whole decode.
pub(crate) fn books_from_values(values: Vec<Value>) -> Result<Vec<Book>> {
    values
        .into_iter()
        .filter(Value::is_object)
        .map(|value| serde_json::from_value(value).or_raise(|| ErrorKind::Decode))
        .collect()
}
