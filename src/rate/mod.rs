//! Smoothed event rates
//!
//! An [`Ewma`] accumulates events between ticks and, on each tick, blends
//! the instantaneous rate into an exponentially-weighted moving average. A
//! [`Meter`] runs three of them (1, 5 and 15 minute time constants) next to
//! a call counter.
//!
//! Nothing here reads the clock or spawns a task: instrumentation calls
//! `update`/`mark`, and an external periodic driver calls
//! `tick`/`crunch_ewma` with the current time.
//!
//! # Units
//!
//! Every rate is in **events per second**, whatever the tick spacing.
//!
//! # Example
//!
//! ```
//! use flowmetrics::rate::{Meter, StandardMeter};
//! use chrono::{TimeDelta, Utc};
//!
//! let start = Utc::now();
//! let mut requests = StandardMeter::new(start, 5, 15);
//!
//! for tick in 1..=120 {
//!     let now = start + TimeDelta::seconds(tick * 5);
//!     requests.mark(now, 50);
//!     requests.crunch_ewma(now);
//! }
//!
//! assert_eq!(requests.count(), 120);
//! assert!((requests.rate1() - 10.0).abs() < 1e-9);
//! ```

mod ewma;
mod meter;

pub use ewma::{EwmaSnapshot, NilEwma, StandardEwma};
pub use meter::{MeterSnapshot, NilMeter, StandardMeter};

use crate::time::Timestamp;

/// Exponentially-weighted moving average of an event rate
///
/// Implementations are single-writer: mutators take `&mut self`.
pub trait Ewma {
    /// Add `n` events to the pending total. No smoothing happens here.
    fn update(&mut self, n: i64);

    /// Fold pending events into the average as of `t`.
    fn tick(&mut self, t: Timestamp);

    /// Current smoothed rate in events per second.
    fn rate(&self) -> f64;

    /// Read-only copy of the current rate.
    fn snapshot(&self) -> EwmaSnapshot;
}

/// Call counter plus 1-, 5- and 15-minute moving-average rates
pub trait Meter {
    /// Number of `mark` calls, not the sum of their magnitudes.
    fn count(&self) -> u64;

    /// Record `n` events at `t`.
    fn mark(&mut self, t: Timestamp, n: i64);

    /// Tick all three averages at `t`.
    fn crunch_ewma(&mut self, t: Timestamp);

    fn rate1(&self) -> f64;

    fn rate5(&self) -> f64;

    fn rate15(&self) -> f64;

    /// Latest timestamp passed to `mark`.
    fn max_time(&self) -> Timestamp;

    /// Latest timestamp passed to `crunch_ewma`.
    fn max_ewma_time(&self) -> Timestamp;

    /// Read-only point-in-time copy.
    fn snapshot(&self) -> MeterSnapshot;
}
