//! Read-only slot backend.
//!
//! Wraps another backend and prevents writes from executing, while still
//! indicating success on return.

use crate::{BackendHandle, SlotBackend, error::Result};

/// Read-only slot backend.
///
/// Wraps another backend and silently drops all write operations, logging an
/// [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

impl SlotBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        tracing::info!(backend = self.name(), key, bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key)
    }
}
