//! Nanosecond timestamps.
//!
//! SysDB timestamps are opaque `u64` counts of nanoseconds since the Unix
//! epoch. This module only owns formatting; ordering and arithmetic use the
//! plain `u64` wherever possible to keep the store's hot path allocation
//! free.

use chrono::{DateTime, Utc};
use std::fmt;

/// Nanoseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn as_nanos(self) -> u64 {
        self.0
    }

    /// `0.9 * old + 0.1 * new`, truncated towards zero, on the nanosecond
    /// delta between two timestamps. See spec.md §3 and §9 — truncation
    /// (not round-to-nearest) is the rounding rule this implementation
    /// commits to.
    pub fn exponential_interval(old_interval_ns: u64, delta_ns: u64) -> u64 {
        let weighted = 0.9 * (old_interval_ns as f64) + 0.1 * (delta_ns as f64);
        weighted as u64
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = (self.0 / 1_000_000_000) as i64;
        let nanos = (self.0 % 1_000_000_000) as u32;
        let dt: DateTime<Utc> = DateTime::from_timestamp(secs, nanos).unwrap_or_default();
        write!(f, "{} +0000", dt.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl From<u64> for Time {
    fn from(value: u64) -> Self {
        Time(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch() {
        assert_eq!(Time(0).to_string(), "1970-01-01 00:00:00 +0000");
    }

    #[test]
    fn interval_truncates() {
        // 0.9*10 + 0.1*20 = 11.0
        assert_eq!(Time::exponential_interval(10, 20), 11);
        // 0.9*11 + 0.1*40 = 13.9 -> truncated to 13
        assert_eq!(Time::exponential_interval(11, 40), 13);
    }
}
