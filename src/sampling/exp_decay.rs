//! Exponentially-decaying reservoir using forward decay
//!
//! See Cormode, Shkapenyuk, Srivastava and Xu, "Forward Decay: A Practical
//! Time Decay Model for Streaming Systems" (ICDE 2009).
//!
//! Each observation gets the priority `exp(alpha * (t - t0)) / u` with
//! `u` uniform in `(0, 1]` and `t0` the start of the current window. The
//! reservoir keeps the `capacity` highest priorities, so recent observations
//! are favoured while admission stays randomized. Because the exponential
//! grows without bound, priorities are renormalized against a fresh `t0`
//! once the window passes its rescale deadline.

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use super::heap::{PriorityHeap, WeightedValue};
use super::Sample;
use crate::time::{seconds, seconds_between, Timestamp};

/// Default decay rate per second. Heavily biases the last five minutes.
pub const DEFAULT_ALPHA: f64 = 0.015;

/// Default window length before priorities are renormalized.
pub const DEFAULT_RESCALE_THRESHOLD_MINUTES: u32 = 60;

/// Largest accepted `alpha * rescale_threshold_seconds`.
///
/// Within one window a priority reaches `exp(alpha * threshold) / u` with
/// `u` as small as 2^-53, which must stay below `f64::MAX`.
pub const MAX_WINDOW_EXPONENT: f64 = 600.0;

/// Forward-decay priority reservoir
///
/// # Thread Safety
///
/// Not internally synchronized: mutation goes through `&mut self` and a
/// single writer is assumed. Owners that share one across threads wrap it
/// in their own lock.
///
/// # Example
///
/// ```
/// use flowmetrics::sampling::{ExpDecaySample, Sample};
/// use chrono::{TimeDelta, Utc};
///
/// let start = Utc::now();
/// let mut sample = ExpDecaySample::new(start, 100, 0.015, 60);
///
/// for i in 0..1000 {
///     sample.update(start + TimeDelta::seconds(i), i);
/// }
///
/// assert_eq!(sample.size(), 100);
/// assert_eq!(sample.count(), 1000);
/// ```
#[derive(Clone, Debug)]
pub struct ExpDecaySample {
    alpha: f64,
    capacity: usize,
    count: u64,
    /// Anchor of the current priority window (t0)
    window_start: Timestamp,
    /// Passing this renormalizes priorities (t1 = t0 + threshold)
    rescale_deadline: Timestamp,
    rescale_threshold: TimeDelta,
    values: PriorityHeap,
    rng: StdRng,
}

impl ExpDecaySample {
    /// Create a sample anchored at `t`, seeded from system entropy.
    ///
    /// # Arguments
    ///
    /// * `t` - Start of the first priority window
    /// * `capacity` - Maximum number of retained values
    /// * `alpha` - Decay rate per second; larger forgets faster
    /// * `rescale_threshold_minutes` - Window length before renormalizing
    ///
    /// # Panics
    ///
    /// If `capacity` is zero, `alpha` is not a positive finite number, or
    /// `alpha` times the threshold in seconds exceeds
    /// [`MAX_WINDOW_EXPONENT`].
    pub fn new(t: Timestamp, capacity: usize, alpha: f64, rescale_threshold_minutes: u32) -> Self {
        Self::with_rng(
            t,
            capacity,
            alpha,
            rescale_threshold_minutes,
            StdRng::from_entropy(),
        )
    }

    /// Create a sample with a fixed seed, for reproducible selection.
    pub fn with_seed(
        t: Timestamp,
        capacity: usize,
        alpha: f64,
        rescale_threshold_minutes: u32,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            t,
            capacity,
            alpha,
            rescale_threshold_minutes,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        t: Timestamp,
        capacity: usize,
        alpha: f64,
        rescale_threshold_minutes: u32,
        rng: StdRng,
    ) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        assert!(
            alpha.is_finite() && alpha > 0.0,
            "alpha must be a positive finite number"
        );

        let rescale_threshold = TimeDelta::minutes(i64::from(rescale_threshold_minutes));
        assert!(
            alpha * seconds(rescale_threshold) <= MAX_WINDOW_EXPONENT,
            "alpha * rescale threshold overflows priorities"
        );

        Self {
            alpha,
            capacity,
            count: 0,
            window_start: t,
            rescale_deadline: deadline_after(t, rescale_threshold),
            rescale_threshold,
            values: PriorityHeap::with_capacity(capacity),
            rng,
        }
    }

    /// Decay rate per second.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Anchor of the current priority window.
    pub fn window_start(&self) -> Timestamp {
        self.window_start
    }

    /// Timestamp past which the next update renormalizes priorities.
    pub fn rescale_deadline(&self) -> Timestamp {
        self.rescale_deadline
    }

    fn priority(&mut self, t: Timestamp) -> f64 {
        // gen() is in [0, 1); flip it so the divisor is never zero
        let u = 1.0 - self.rng.gen::<f64>();
        (self.alpha * seconds_between(self.window_start, t)).exp() / u
    }

    /// Renormalize every priority against a window starting at `t`.
    fn rescale(&mut self, t: Timestamp) {
        let old_start = self.window_start;
        let factor = (-self.alpha * seconds_between(old_start, t)).exp();

        self.values.rescale(factor);
        self.window_start = t;
        self.rescale_deadline = deadline_after(t, self.rescale_threshold);

        trace!(
            old_start = %old_start,
            new_start = %t,
            factor,
            retained = self.values.len(),
            "rescaled forward-decay priorities"
        );
    }

    #[cfg(test)]
    fn priorities(&self) -> Vec<f64> {
        self.values.iter().map(|e| e.priority).collect()
    }
}

fn deadline_after(t: Timestamp, threshold: TimeDelta) -> Timestamp {
    t.checked_add_signed(threshold)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl Sample for ExpDecaySample {
    fn update(&mut self, t: Timestamp, value: i64) {
        self.count += 1;
        // Renormalize first so the new priority is computed in the fresh window
        if t > self.rescale_deadline {
            self.rescale(t);
        }

        let entry = WeightedValue {
            priority: self.priority(t),
            value,
        };
        if self.values.len() < self.capacity {
            self.values.push(entry);
        } else if self
            .values
            .peek()
            .map_or(true, |min| entry.priority > min.priority)
        {
            self.values.pop();
            self.values.push(entry);
        }
    }

    fn values(&self) -> Vec<i64> {
        self.values.iter().map(|e| e.value).collect()
    }

    fn clear(&mut self, t: Timestamp) {
        self.count = 0;
        self.window_start = t;
        self.rescale_deadline = deadline_after(t, self.rescale_threshold);
        self.values.clear();
    }

    fn zero_out(&mut self) {
        self.values.clear();
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn rescale_threshold(&self) -> Option<TimeDelta> {
        Some(self.rescale_threshold)
    }
}
