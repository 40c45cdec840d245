//! Exponentially-weighted moving average driven by external ticks

use tracing::debug;

use super::Ewma;
use crate::time::{seconds_between, Timestamp};
use crate::traits::snapshot_fault;

/// Standard EWMA over an event stream
///
/// Events accumulate in `uncounted` until [`tick`](Ewma::tick). Each tick
/// computes the instantaneous rate over the elapsed interval and blends it
/// in with
///
/// ```text
/// alpha = 1 - exp(-elapsed_seconds / 60 / window_minutes)
/// ```
///
/// recomputed from the actual elapsed time on every tick, so irregular
/// tick spacing decays the average exactly as much as regular spacing
/// covering the same span. The first tick seeds the average with the
/// instantaneous rate instead of blending.
///
/// Before the first tick [`rate`](Ewma::rate) reads `0.0`. The pending
/// total saturates at the `i64` bounds.
///
/// # Example
///
/// ```
/// use flowmetrics::rate::{Ewma, StandardEwma};
/// use chrono::{TimeDelta, Utc};
///
/// let start = Utc::now();
/// let mut ewma = StandardEwma::one_minute(start);
///
/// ewma.update(30);
/// ewma.tick(start + TimeDelta::seconds(5));
///
/// // Seeded: 30 events over 5 seconds
/// assert_eq!(ewma.rate(), 6.0);
/// ```
#[derive(Clone, Debug)]
pub struct StandardEwma {
    /// Events since the last tick
    uncounted: i64,
    /// Smoothed rate, events per second
    rate: f64,
    initialized: bool,
    /// Time constant in minutes
    window: f64,
    last_tick: Timestamp,
}

impl StandardEwma {
    /// Create an average with a `window_minutes` time constant, first
    /// interval starting at `t`.
    ///
    /// # Panics
    ///
    /// If `window_minutes` is not a positive finite number.
    pub fn new(t: Timestamp, window_minutes: f64) -> Self {
        assert!(
            window_minutes.is_finite() && window_minutes > 0.0,
            "window must be a positive finite number of minutes"
        );

        Self {
            uncounted: 0,
            rate: 0.0,
            initialized: false,
            window: window_minutes,
            last_tick: t,
        }
    }

    /// One-minute moving average.
    pub fn one_minute(t: Timestamp) -> Self {
        Self::new(t, 1.0)
    }

    /// Five-minute moving average.
    pub fn five_minute(t: Timestamp) -> Self {
        Self::new(t, 5.0)
    }

    /// Fifteen-minute moving average.
    pub fn fifteen_minute(t: Timestamp) -> Self {
        Self::new(t, 15.0)
    }

    /// Smoothing factor applied to a tick `elapsed_seconds` after the last.
    pub fn alpha(&self, elapsed_seconds: f64) -> f64 {
        1.0 - (-elapsed_seconds / 60.0 / self.window).exp()
    }

    /// Whether the first tick has happened.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn window_minutes(&self) -> f64 {
        self.window
    }

    pub fn last_tick(&self) -> Timestamp {
        self.last_tick
    }

    /// Events recorded since the last tick.
    pub fn uncounted(&self) -> i64 {
        self.uncounted
    }
}

impl Ewma for StandardEwma {
    fn update(&mut self, n: i64) {
        self.uncounted = self.uncounted.saturating_add(n);
    }

    fn tick(&mut self, t: Timestamp) {
        let elapsed = seconds_between(self.last_tick, t);
        if elapsed <= 0.0 {
            // Same instant (or a late tick): nothing to divide by
            debug!(
                window = self.window,
                last_tick = %self.last_tick,
                tick = %t,
                "ignoring tick that does not advance time"
            );
            return;
        }

        let instant_rate = self.uncounted as f64 / elapsed;
        if self.initialized {
            self.rate += self.alpha(elapsed) * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
            debug!(window = self.window, rate = instant_rate, "seeded moving average");
        }

        self.uncounted = 0;
        self.last_tick = t;
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn snapshot(&self) -> EwmaSnapshot {
        EwmaSnapshot(self.rate)
    }
}

/// Frozen rate of another EWMA
///
/// `update` and `tick` abort with
/// [`MetricError::OperationOnSnapshot`](crate::MetricError).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EwmaSnapshot(pub f64);

impl Ewma for EwmaSnapshot {
    fn update(&mut self, _n: i64) {
        snapshot_fault("update")
    }

    fn tick(&mut self, _t: Timestamp) {
        snapshot_fault("tick")
    }

    fn rate(&self) -> f64 {
        self.0
    }

    fn snapshot(&self) -> EwmaSnapshot {
        *self
    }
}

/// EWMA that ignores everything and reads zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NilEwma;

impl Ewma for NilEwma {
    fn update(&mut self, _n: i64) {}

    fn tick(&mut self, _t: Timestamp) {}

    fn rate(&self) -> f64 {
        0.0
    }

    fn snapshot(&self) -> EwmaSnapshot {
        EwmaSnapshot(0.0)
    }
}
