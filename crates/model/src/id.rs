use crate::Timestamp;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
// 36^7 > u32::MAX, so seven digits always fit the random component.
const RANDOM_WIDTH: usize = 7;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Opaque identifier for books, chapters and history entries.
///
/// Identifiers read from disk are taken verbatim (anything the original
/// record used is kept). An empty identifier is what a record missing its
/// `id` decodes to; such records are never inserted into a [`Library`](crate::Library).
#[derive(Debug, Display, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);
impl Id {
    /// Draw a fresh identifier: base-36 milliseconds, a fixed-width random
    /// component and a per-process sequence number.
    ///
    /// All identifier kinds come from this one generator.
    pub fn generate(now: Timestamp) -> Self {
        let random: u32 = rand::random();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let mut id = base36(now.as_millis().max(0).unsigned_abs());
        id.push_str(&format!("{:0>width$}", base36(u64::from(random)), width = RANDOM_WIDTH));
        id.push_str(&base36(sequence));
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}
impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}
impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| d as char).collect()
}
