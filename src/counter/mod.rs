//! Signed event counters
//!
//! # Example
//!
//! ```
//! use flowmetrics::counter::{Counter, StandardCounter};
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let connections = StandardCounter::new(now, 15);
//!
//! connections.dec(now, 5);
//! connections.inc(now, 3);
//! assert_eq!(connections.count(), -2);
//! ```

mod atomic;

pub use atomic::{CounterSnapshot, NilCounter, StandardCounter};

use crate::time::Timestamp;

/// Integer that can be incremented and decremented
///
/// Mutators take `&self`; the standard implementation is lock-free.
pub trait Counter {
    fn count(&self) -> i64;

    fn inc(&self, t: Timestamp, n: i64);

    fn dec(&self, t: Timestamp, n: i64);

    /// Reset to zero as of `t`.
    fn clear(&self, t: Timestamp);

    /// Latest timestamp passed to a mutator.
    fn max_time(&self) -> Timestamp;

    /// Read-only point-in-time copy.
    fn snapshot(&self) -> CounterSnapshot;
}
