//! Lock-free counter

use std::sync::atomic::{AtomicI64, Ordering};

use super::Counter;
use crate::time::{exceeds_minutes, from_micros, to_micros, Timestamp};
use crate::traits::{snapshot_fault, Metric};

/// Atomic signed counter
///
/// Safe for unsynchronized concurrent use: each `inc`/`dec` is a single
/// atomic read-modify-write. No ordering is implied between concurrent
/// writers. The last-update time is kept alongside at microsecond
/// resolution and only moves forward.
#[derive(Debug)]
pub struct StandardCounter {
    count: AtomicI64,
    /// Microseconds since the Unix epoch
    last_update: AtomicI64,
    /// Minutes without updates before the counter counts as stale
    stale_threshold: u32,
}

impl StandardCounter {
    /// Number of statistics an exporter emits for a counter.
    pub const KEY_COUNT: usize = 1;

    pub fn new(t: Timestamp, stale_threshold_minutes: u32) -> Self {
        Self {
            count: AtomicI64::new(0),
            last_update: AtomicI64::new(to_micros(t)),
            stale_threshold: stale_threshold_minutes,
        }
    }

    /// Latest timestamp passed to a mutator.
    pub fn max_time(&self) -> Timestamp {
        from_micros(self.last_update.load(Ordering::Relaxed))
    }

    /// Whether more than the stale threshold has passed since the last update.
    pub fn stale(&self, now: Timestamp) -> bool {
        exceeds_minutes(self.max_time(), now, self.stale_threshold)
    }

    /// Whether the counter changed after `t`.
    pub fn updated_since(&self, t: Timestamp) -> bool {
        self.max_time() > t
    }

    fn touch(&self, t: Timestamp) {
        self.last_update.fetch_max(to_micros(t), Ordering::Relaxed);
    }
}

impl Counter for StandardCounter {
    fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }

    fn inc(&self, t: Timestamp, n: i64) {
        self.count.fetch_add(n, Ordering::Relaxed);
        self.touch(t);
    }

    fn dec(&self, t: Timestamp, n: i64) {
        self.count.fetch_sub(n, Ordering::Relaxed);
        self.touch(t);
    }

    fn clear(&self, t: Timestamp) {
        self.count.store(0, Ordering::Relaxed);
        self.last_update.store(to_micros(t), Ordering::Relaxed);
    }

    fn max_time(&self) -> Timestamp {
        StandardCounter::max_time(self)
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            count: self.count(),
            last_update: self.max_time(),
        }
    }
}

impl Metric for StandardCounter {
    fn update(&mut self, t: Timestamp, value: i64) {
        self.inc(t, value);
    }

    fn max_time(&self) -> Timestamp {
        StandardCounter::max_time(self)
    }

    fn stale(&self, now: Timestamp) -> bool {
        StandardCounter::stale(self, now)
    }

    fn key_count(&self) -> usize {
        Self::KEY_COUNT
    }

    fn updated_since(&self, t: Timestamp) -> bool {
        StandardCounter::updated_since(self, t)
    }
}

/// Point-in-time copy of a counter
///
/// `inc`, `dec` and `clear` abort with
/// [`MetricError::OperationOnSnapshot`](crate::MetricError).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterSnapshot {
    pub count: i64,
    pub last_update: Timestamp,
}

impl Counter for CounterSnapshot {
    fn count(&self) -> i64 {
        self.count
    }

    fn inc(&self, _t: Timestamp, _n: i64) {
        snapshot_fault("inc")
    }

    fn dec(&self, _t: Timestamp, _n: i64) {
        snapshot_fault("dec")
    }

    fn clear(&self, _t: Timestamp) {
        snapshot_fault("clear")
    }

    fn max_time(&self) -> Timestamp {
        self.last_update
    }

    fn snapshot(&self) -> CounterSnapshot {
        *self
    }
}

/// Counter that ignores everything and reads zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NilCounter;

impl Counter for NilCounter {
    fn count(&self) -> i64 {
        0
    }

    fn inc(&self, _t: Timestamp, _n: i64) {}

    fn dec(&self, _t: Timestamp, _n: i64) {}

    fn clear(&self, _t: Timestamp) {}

    fn max_time(&self) -> Timestamp {
        Timestamp::default()
    }

    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot::default()
    }
}
