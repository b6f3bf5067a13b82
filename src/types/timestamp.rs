//! Capture timestamps

use std::fmt;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Point in time a frame was captured, relative to the Unix epoch.
///
/// Ordering is total and chronological. Captures can carry negative
/// timestamp offsets, so the seconds part is signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    secs: i64,
    nanos: u32,
}

impl Timestamp {
    /// The Unix epoch
    pub const UNIX_EPOCH: Timestamp = Timestamp { secs: 0, nanos: 0 };

    /// Create a timestamp, carrying any whole seconds held in `nanos`.
    pub fn new(secs: i64, nanos: u32) -> Self {
        let carry = i64::from(nanos / NANOS_PER_SEC);
        Self { secs: secs.saturating_add(carry), nanos: nanos % NANOS_PER_SEC }
    }

    /// Create a timestamp from a signed nanosecond count since the epoch.
    pub fn from_unix_nanos(total: i128) -> Self {
        let nanos_per_sec = i128::from(NANOS_PER_SEC);
        let secs = total.div_euclid(nanos_per_sec);
        let nanos = total.rem_euclid(nanos_per_sec) as u32;
        let secs = i64::try_from(secs).unwrap_or(if secs < 0 { i64::MIN } else { i64::MAX });
        Self { secs, nanos }
    }

    /// Whole seconds since the epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.secs
    }

    /// Nanoseconds past `unix_seconds()`.
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}
