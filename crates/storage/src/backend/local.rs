//! Local filesystem slot backend.
//!
//! Each slot is one file directly inside a configured root directory, named
//! after its key. Writes go to a temporary file in the same directory which
//! is then renamed over the slot, so a crash mid-write leaves the previous
//! value intact.

use crate::error::{ErrorKind, Result};
use crate::{SlotBackend, validate_key};
use std::fs::{self, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Local filesystem slot backend.
///
/// # Examples
///
/// ```no_run
/// use quire_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local", "/home/me/.local/share/quire")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct LocalBackend {
    name: String,
    /// Directory holding one file per slot
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend, creating the root directory if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists but is not a
    /// directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidRoot(root));
            }
        } else {
            create_dir_all(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.root.join(validate_key(key)?))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

impl SlotBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::map_io_error(e, &path).into()),
        }
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.slot_path(key)?;
        let mut temp = NamedTempFile::new_in(&self.root).map_err(|e| Self::map_io_error(e, &self.root))?;
        temp.write_all(data).map_err(|e| Self::map_io_error(e, temp.path()))?;
        temp.as_file().sync_all().map_err(|e| Self::map_io_error(e, temp.path()))?;
        temp.persist(&path).map_err(|e| Self::map_io_error(e.error, &path))?;
        tracing::trace!(backend = %self.name, key, bytes = data.len(), "Wrote slot");
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let path = self.slot_path(key)?;
        Ok(path.try_exists().map_err(|e| Self::map_io_error(e, &path))?)
    }
}
