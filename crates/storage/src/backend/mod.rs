//! Slot backend trait and implementations.
//!
//! A slot is a single named, durable value: the equivalent of one key in a
//! browser's local storage. The library record lives in exactly one slot and
//! is always read and written whole.

mod local;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;

/// Unified interface for durable slot storage.
///
/// All operations are synchronous and complete before returning; callers
/// never observe a partially written slot. Keys must pass
/// [`validate_key`](crate::validate_key), and implementations enforce it.
///
/// # Examples
///
/// ```
/// use quire_storage::{SlotBackend, error::Result};
///
/// fn byte_size(backend: &dyn SlotBackend, key: &str) -> Result<usize> {
///     Ok(backend.read(key)?.map(|data| data.len()).unwrap_or(0))
/// }
/// ```
pub trait SlotBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Read the full contents of a slot.
    ///
    /// An absent slot is `Ok(None)`, not an error.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the contents of a slot, creating it if needed.
    ///
    /// Overwrites unconditionally. Implementations must not leave a torn
    /// value behind if they fail part-way.
    fn write(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Check whether a slot holds a value.
    ///
    /// Default implementation reads the whole slot; backends that can answer
    /// more cheaply should override it.
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read(key)?.is_some())
    }
}
