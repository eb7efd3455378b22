use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::{Date, OffsetDateTime};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Milliseconds since the Unix epoch.
///
/// Stored as a bare integer in JSON. A value of zero is what a record missing
/// its timestamp decodes to, and is treated as "never set".
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);
impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc())
    }

    pub const fn is_set(self) -> bool {
        self.0 > 0
    }

    /// Time elapsed from `earlier` until `self`, clamped to zero when the
    /// clock went backwards.
    pub fn since(self, earlier: Timestamp) -> Duration {
        let millis = self.0.saturating_sub(earlier.0).max(0);
        Duration::from_millis(millis.unsigned_abs())
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Calendar date (UTC) of this timestamp, if it is representable.
    pub fn date(self) -> Option<Date> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.0) * NANOS_PER_MILLI)
            .ok()
            .map(|dt| dt.date())
    }
}
impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        let millis = dt.unix_timestamp_nanos() / NANOS_PER_MILLI;
        Self(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}
