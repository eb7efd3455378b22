//! Slot key validation.
//!
//! Slot keys double as file names for the local backend, so anything that
//! could name a different file (separators, traversal, hidden files) is
//! refused up front for every backend alike.

use crate::error::{ErrorKind, Result};

const MAX_KEY_LEN: usize = 255;

/// Validates a slot key.
///
/// # Examples
///
/// ```
/// use quire_storage::validate_key;
/// assert!(validate_key("bookAuthorData").is_ok());
/// assert!(validate_key("library-v2.json").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("../escape").is_err());
/// assert!(validate_key(".hidden").is_err());
/// ```
pub fn validate(key: &str) -> Result<&str> {
    let invalid = key.is_empty()
        || key.len() > MAX_KEY_LEN
        || key.starts_with('.')
        || key.chars().any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());
    if invalid {
        exn::bail!(ErrorKind::InvalidKey(key.to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bookAuthorData")]
    #[case("library.json")]
    #[case("with space")]
    #[case("ünïcödé")]
    fn test_valid_keys(#[case] key: &str) {
        assert_eq!(validate(key).unwrap(), key);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case(".tmp123")]
    #[case("a/b")]
    #[case("a\\b")]
    #[case("a\0b")]
    #[case("line\nbreak")]
    fn test_invalid_keys(#[case] key: &str) {
        let err = validate(key).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidKey(k) if k == key));
    }

    #[test]
    fn test_overlong_key() {
        assert!(validate(&"k".repeat(MAX_KEY_LEN)).is_ok());
        assert!(validate(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }
}
