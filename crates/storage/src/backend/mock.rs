//! In-memory slot backend for testing.

use crate::error::{ErrorKind, Result};
use crate::{SlotBackend, validate_key};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// In-memory slot backend for testing.
///
/// Slots are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// can operate on `&self` without external synchronisation. Successful writes
/// are counted so tests can assert when something was (or wasn't) persisted.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "mock")] {
/// use quire_storage::backend::MockBackend;
/// use quire_storage::SlotBackend;
///
/// let backend = MockBackend::with_slots([("bookAuthorData", "{}")]);
/// assert!(backend.exists("bookAuthorData").unwrap());
/// backend.write("other", b"data").unwrap();
/// assert_eq!(backend.writes(), 1);
/// # }
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with slots.
    ///
    /// Panics if any key fails validation. If test setup is wrong, then test
    /// should not pass.
    pub fn with_slots(slots: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (key, data) in slots {
            let key = key.into();
            // The panic here is DELIBERATE. MockBackend is intended to be
            // used in tests; panics are expected. There is no error result.
            if validate_key(&key).is_err() {
                panic!("MockBackend::with_slots: invalid key {key:?}");
            }
            map.insert(key, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            writes: AtomicUsize::new(0),
        }
    }

    /// Change the name of the mock backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of successful writes since construction.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn poisoned<T>(_: PoisonError<T>) -> ErrorKind {
        ErrorKind::BackendError("mock storage lock poisoned".to_string())
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let slots: [(&str, &str); 0] = [];
        Self::with_slots(slots)
    }
}

impl SlotBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = validate_key(key)?;
        let guard = self.storage.read().map_err(Self::poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let key = validate_key(key)?;
        let mut guard = self.storage.write().map_err(Self::poisoned)?;
        guard.insert(key.to_string(), data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let key = validate_key(key)?;
        let guard = self.storage.read().map_err(Self::poisoned)?;
        Ok(guard.contains_key(key))
    }
}
