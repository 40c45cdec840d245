//! Three-window event meter

use chrono::TimeDelta;

use super::{Ewma, Meter, StandardEwma};
use crate::time::{exceeds_minutes, Timestamp};
use crate::traits::{snapshot_fault, Metric};

/// Meter backed by 1-, 5- and 15-minute [`StandardEwma`]s
///
/// # Counting
///
/// [`count`](Meter::count) is the number of `mark` calls. `mark(t, n)`
/// feeds `n` events into the moving averages but bumps the count by one,
/// so callers marking weighted events get call counts, not magnitudes.
///
/// # Thread Safety
///
/// Single writer: `mark` and `crunch_ewma` take `&mut self` and nothing is
/// locked internally.
#[derive(Clone, Debug)]
pub struct StandardMeter {
    count: u64,
    a1: StandardEwma,
    a5: StandardEwma,
    a15: StandardEwma,
    last_update: Timestamp,
    last_ewma_update: Timestamp,
    /// Minimum spacing between crunches on the export path
    ewma_interval: TimeDelta,
    /// Minutes without marks before the meter counts as stale
    stale_threshold: u32,
}

impl StandardMeter {
    /// Number of statistics an exporter emits: count plus three rates.
    pub const KEY_COUNT: usize = 4;

    /// Create a meter whose averages start at `t`.
    ///
    /// # Arguments
    ///
    /// * `t` - Creation time; both update timestamps start here
    /// * `ewma_interval_secs` - How often the export path should crunch
    /// * `stale_threshold_minutes` - Inactivity before [`stale`](Self::stale)
    pub fn new(t: Timestamp, ewma_interval_secs: u32, stale_threshold_minutes: u32) -> Self {
        Self {
            count: 0,
            a1: StandardEwma::one_minute(t),
            a5: StandardEwma::five_minute(t),
            a15: StandardEwma::fifteen_minute(t),
            last_update: t,
            last_ewma_update: t,
            ewma_interval: TimeDelta::seconds(i64::from(ewma_interval_secs)),
            stale_threshold: stale_threshold_minutes,
        }
    }

    pub fn ewma_interval(&self) -> TimeDelta {
        self.ewma_interval
    }

    /// Latest timestamp passed to `mark`.
    pub fn max_time(&self) -> Timestamp {
        self.last_update
    }

    /// Whether at least one EWMA interval has passed since the last crunch.
    ///
    /// Exporters crunch and emit the three rates only when this holds, and
    /// emit just the count otherwise.
    pub fn crunch_due(&self, now: Timestamp) -> bool {
        now - self.last_ewma_update >= self.ewma_interval
    }

    /// Whether more than the stale threshold has passed since the last mark.
    pub fn stale(&self, now: Timestamp) -> bool {
        exceeds_minutes(self.last_update, now, self.stale_threshold)
    }

    /// Whether there is a newer mark than `t`, or the rates are overdue.
    pub fn updated_since(&self, t: Timestamp) -> bool {
        self.last_update > t || t - self.last_ewma_update > self.ewma_interval
    }
}

impl Meter for StandardMeter {
    fn count(&self) -> u64 {
        self.count
    }

    /// Record `n` events at `t`.
    ///
    /// The moving averages receive `n`; the count grows by one call.
    fn mark(&mut self, t: Timestamp, n: i64) {
        self.a1.update(n);
        self.a5.update(n);
        self.a15.update(n);

        self.count += 1;
        if t > self.last_update {
            self.last_update = t;
        }
    }

    fn crunch_ewma(&mut self, t: Timestamp) {
        self.a1.tick(t);
        self.a5.tick(t);
        self.a15.tick(t);

        if t > self.last_ewma_update {
            self.last_ewma_update = t;
        }
    }

    fn rate1(&self) -> f64 {
        self.a1.rate()
    }

    fn rate5(&self) -> f64 {
        self.a5.rate()
    }

    fn rate15(&self) -> f64 {
        self.a15.rate()
    }

    fn max_time(&self) -> Timestamp {
        self.last_update
    }

    fn max_ewma_time(&self) -> Timestamp {
        self.last_ewma_update
    }

    fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot {
            count: self.count,
            rate1: self.rate1(),
            rate5: self.rate5(),
            rate15: self.rate15(),
            last_update: self.last_update,
            last_ewma_update: self.last_ewma_update,
        }
    }
}

impl Metric for StandardMeter {
    fn update(&mut self, t: Timestamp, value: i64) {
        self.mark(t, value);
    }

    fn max_time(&self) -> Timestamp {
        StandardMeter::max_time(self)
    }

    fn stale(&self, now: Timestamp) -> bool {
        StandardMeter::stale(self, now)
    }

    fn key_count(&self) -> usize {
        Self::KEY_COUNT
    }

    fn updated_since(&self, t: Timestamp) -> bool {
        StandardMeter::updated_since(self, t)
    }
}

/// Point-in-time copy of a meter
///
/// `mark` and `crunch_ewma` abort with
/// [`MetricError::OperationOnSnapshot`](crate::MetricError).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterSnapshot {
    pub count: u64,
    pub rate1: f64,
    pub rate5: f64,
    pub rate15: f64,
    pub last_update: Timestamp,
    pub last_ewma_update: Timestamp,
}

impl Meter for MeterSnapshot {
    fn count(&self) -> u64 {
        self.count
    }

    fn mark(&mut self, _t: Timestamp, _n: i64) {
        snapshot_fault("mark")
    }

    fn crunch_ewma(&mut self, _t: Timestamp) {
        snapshot_fault("crunch_ewma")
    }

    fn rate1(&self) -> f64 {
        self.rate1
    }

    fn rate5(&self) -> f64 {
        self.rate5
    }

    fn rate15(&self) -> f64 {
        self.rate15
    }

    fn max_time(&self) -> Timestamp {
        self.last_update
    }

    fn max_ewma_time(&self) -> Timestamp {
        self.last_ewma_update
    }

    fn snapshot(&self) -> MeterSnapshot {
        *self
    }
}

/// Meter that ignores everything and reads zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NilMeter;

impl Meter for NilMeter {
    fn count(&self) -> u64 {
        0
    }

    fn mark(&mut self, _t: Timestamp, _n: i64) {}

    fn crunch_ewma(&mut self, _t: Timestamp) {}

    fn rate1(&self) -> f64 {
        0.0
    }

    fn rate5(&self) -> f64 {
        0.0
    }

    fn rate15(&self) -> f64 {
        0.0
    }

    fn max_time(&self) -> Timestamp {
        Timestamp::default()
    }

    fn max_ewma_time(&self) -> Timestamp {
        Timestamp::default()
    }

    fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot::default()
    }
}
