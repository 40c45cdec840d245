//! Timestamp helpers shared by every metric family
//!
//! All metrics are driven by caller-supplied timestamps rather than reading
//! the clock themselves, so tests and replays are deterministic.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Point in time attached to an observation or a tick.
pub type Timestamp = DateTime<Utc>;

/// Elapsed time from `earlier` to `later` in fractional seconds.
///
/// Negative when `later` precedes `earlier`.
#[inline]
pub fn seconds_between(earlier: Timestamp, later: Timestamp) -> f64 {
    seconds(later - earlier)
}

/// A [`TimeDelta`] as fractional seconds, microsecond resolution.
#[inline]
pub fn seconds(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        // Only reachable for spans beyond ~292k years
        None => delta.num_seconds() as f64,
    }
}

/// Threshold helper: has more than `minutes` passed between `since` and `now`?
#[inline]
pub fn exceeds_minutes(since: Timestamp, now: Timestamp, minutes: u32) -> bool {
    now - since > TimeDelta::minutes(i64::from(minutes))
}

/// Encode a timestamp for storage in an atomic.
#[inline]
pub(crate) fn to_micros(t: Timestamp) -> i64 {
    t.timestamp_micros()
}

/// Inverse of [`to_micros`]. Out-of-range input maps to the Unix epoch.
#[inline]
pub(crate) fn from_micros(us: i64) -> Timestamp {
    Utc.timestamp_micros(us).single().unwrap_or_default()
}
