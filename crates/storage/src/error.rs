//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Access denied (permissions)
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// Slot key is empty, hidden, or would escape the backend root
    #[display("invalid slot key: {_0:?}")]
    InvalidKey(#[error(not(source))] String),
    /// Backend root is not an absolute directory
    #[display("invalid storage root: {}", _0.display())]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// Backend-specific error
    #[display("backend error: {_0}")]
    BackendError(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::BackendError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::InvalidKey("../x".to_string()), "invalid slot key: \"../x\"")]
    #[case(ErrorKind::BackendError("lock poisoned".to_string()), "backend error: lock poisoned")]
    #[case(ErrorKind::InvalidRoot(PathBuf::from("relative")), "invalid storage root: relative")]
    fn test_display(#[case] kind: ErrorKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorKind::from(IoError::other("disk")).is_retryable());
        assert!(!ErrorKind::InvalidKey(String::new()).is_retryable());
        assert!(!ErrorKind::PermissionDenied(PathBuf::from("/x")).is_retryable());
    }
}
