//! Reservoir sampling for bounded-memory distribution estimates
//!
//! A [`Sample`] keeps at most `capacity` observations out of an unbounded
//! stream and derives distribution statistics from whatever it currently
//! retains.
//!
//! # Strategies
//!
//! - [`UniformSample`]: Vitter's Algorithm R, every observation equally
//!   likely to be retained. Internally locked, safe for many producers.
//! - [`ExpDecaySample`]: forward-decay priority reservoir favouring recent
//!   observations. Single writer, no internal lock.
//! - [`SampleSnapshot`]: frozen copy of another sample; mutators fault.
//! - [`NilSample`]: records nothing, reads zero. Use it where metrics are
//!   disabled.
//!
//! # Example
//!
//! ```
//! use flowmetrics::sampling::UniformSample;
//! use chrono::Utc;
//!
//! // Shared by reference: updates lock internally
//! let sample = UniformSample::new(3);
//! let now = Utc::now();
//!
//! for v in 1..=5 {
//!     sample.update(now, v);
//! }
//!
//! assert_eq!(sample.size(), 3);
//! assert_eq!(sample.count(), 5);
//! ```

mod exp_decay;
mod heap;
mod snapshot;
mod uniform;

use core::fmt::Debug;

use chrono::TimeDelta;

use crate::statistics;
use crate::time::Timestamp;

pub use exp_decay::{
    ExpDecaySample, DEFAULT_ALPHA, DEFAULT_RESCALE_THRESHOLD_MINUTES, MAX_WINDOW_EXPONENT,
};
pub use snapshot::{NilSample, SampleSnapshot};
pub use uniform::UniformSample;

/// Default reservoir size, roughly a 99.9% confidence level with a 5%
/// margin of error for a normal distribution.
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// Common contract of every reservoir strategy
///
/// The statistic readers are provided methods computed over
/// [`values`](Sample::values), which is always an independent copy.
pub trait Sample: Debug {
    /// Record one observation taken at `t`.
    fn update(&mut self, t: Timestamp, value: i64);

    /// Copy of the currently retained values, in no particular order.
    fn values(&self) -> Vec<i64>;

    /// Drop everything, reset the count, and re-anchor time bookkeeping at `t`.
    fn clear(&mut self, t: Timestamp);

    /// Drop the retained values but keep the count and time anchors.
    fn zero_out(&mut self);

    /// Total observations ever submitted since the last clear.
    ///
    /// May exceed [`capacity`](Sample::capacity).
    fn count(&self) -> u64;

    /// Number of values currently retained.
    fn size(&self) -> usize;

    /// Maximum number of retained values.
    fn capacity(&self) -> usize;

    /// Window after which priorities are renormalized, for strategies that
    /// have one.
    fn rescale_threshold(&self) -> Option<TimeDelta> {
        None
    }

    /// Read-only point-in-time copy.
    fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot::new(self.count(), self.values())
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn min(&self) -> i64 {
        statistics::min(&self.values())
    }

    fn max(&self) -> i64 {
        statistics::max(&self.values())
    }

    fn sum(&self) -> i64 {
        statistics::sum(&self.values())
    }

    fn mean(&self) -> f64 {
        statistics::mean(&self.values())
    }

    fn variance(&self) -> f64 {
        statistics::variance(&self.values())
    }

    fn std_dev(&self) -> f64 {
        statistics::std_dev(&self.values())
    }

    fn percentile(&self, p: f64) -> f64 {
        statistics::percentile(&mut self.values(), p)
    }

    fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        statistics::percentiles(&mut self.values(), ps)
    }
}
