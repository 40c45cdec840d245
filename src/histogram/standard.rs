//! Reservoir-backed histogram

use chrono::TimeDelta;

use super::summary::HistogramSummary;
use crate::sampling::{Sample, SampleSnapshot};
use crate::time::{exceeds_minutes, Timestamp};
use crate::traits::Metric;

/// Histogram deriving distribution statistics from an owned [`Sample`]
///
/// Statistics reflect the reservoir's current contents, which may not
/// include every value ever recorded. Mutation goes through `&mut self`;
/// any sharing lock belongs to the owner.
#[derive(Clone, Debug)]
pub struct Histogram<S: Sample> {
    sample: S,
    last_update: Timestamp,
    /// Minutes without updates before the histogram counts as stale
    stale_threshold: u32,
}

impl<S: Sample> Histogram<S> {
    /// Wrap `sample`. The histogram starts out with its last update at the
    /// Unix epoch.
    pub fn new(sample: S, stale_threshold_minutes: u32) -> Self {
        Self {
            sample,
            last_update: Timestamp::default(),
            stale_threshold: stale_threshold_minutes,
        }
    }

    /// Record a value observed at `t`.
    pub fn update(&mut self, t: Timestamp, value: i64) {
        self.sample.update(t, value);
        if t > self.last_update {
            self.last_update = t;
        }
    }

    /// Clear the underlying sample, re-anchoring it at `t`.
    pub fn clear(&mut self, t: Timestamp) {
        self.sample.clear(t);
    }

    /// Drop retained values, keeping counts and timestamps.
    pub fn zero_out(&mut self) {
        self.sample.zero_out();
    }

    /// Observations recorded since the last clear.
    pub fn count(&self) -> u64 {
        self.sample.count()
    }

    pub fn min(&self) -> i64 {
        self.sample.min()
    }

    pub fn max(&self) -> i64 {
        self.sample.max()
    }

    pub fn sum(&self) -> i64 {
        self.sample.sum()
    }

    pub fn mean(&self) -> f64 {
        self.sample.mean()
    }

    pub fn variance(&self) -> f64 {
        self.sample.variance()
    }

    pub fn std_dev(&self) -> f64 {
        self.sample.std_dev()
    }

    pub fn percentile(&self, p: f64) -> f64 {
        self.sample.percentile(p)
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        self.sample.percentiles(ps)
    }

    /// The underlying reservoir.
    pub fn sample(&self) -> &S {
        &self.sample
    }

    /// Latest timestamp passed to [`update`](Self::update).
    pub fn max_time(&self) -> Timestamp {
        self.last_update
    }

    /// Whether more than the stale threshold has passed since the last update.
    pub fn stale(&self, now: Timestamp) -> bool {
        exceeds_minutes(self.last_update, now, self.stale_threshold)
    }

    pub fn stale_threshold(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.stale_threshold))
    }

    /// Whether any value arrived after `t`.
    pub fn updated_since(&self, t: Timestamp) -> bool {
        self.last_update > t
    }

    /// The fixed export set, computed from a single copy of the reservoir.
    pub fn summary(&self) -> HistogramSummary {
        HistogramSummary::from_values(&mut self.sample.values())
    }

    /// Read-only copy. Mutating the returned histogram faults.
    pub fn snapshot(&self) -> Histogram<SampleSnapshot> {
        Histogram {
            sample: self.sample.snapshot(),
            last_update: self.last_update,
            stale_threshold: self.stale_threshold,
        }
    }
}

impl<S: Sample> Metric for Histogram<S> {
    fn update(&mut self, t: Timestamp, value: i64) {
        Histogram::update(self, t, value);
    }

    fn max_time(&self) -> Timestamp {
        self.last_update
    }

    fn stale(&self, now: Timestamp) -> bool {
        Histogram::stale(self, now)
    }

    fn key_count(&self) -> usize {
        HistogramSummary::KEY_COUNT
    }

    fn updated_since(&self, t: Timestamp) -> bool {
        Histogram::updated_since(self, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{ExpDecaySample, NilSample, UniformSample};
    use crate::MetricError;
    use chrono::{TimeZone, Utc};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_empty() {
        let h = Histogram::new(UniformSample::new(100), 15);

        assert_eq!(h.count(), 0);
        assert_eq!(h.min(), 0);
        assert_eq!(h.max(), 0);
        assert_eq!(h.mean(), 0.0);
        assert_eq!(h.std_dev(), 0.0);
        assert_eq!(h.variance(), 0.0);
        assert_eq!(h.percentile(0.5), 0.0);
        assert_eq!(h.percentiles(&[0.5, 0.99]), vec![0.0, 0.0]);
        assert_eq!(h.summary(), HistogramSummary::default());
        assert_eq!(h.max_time(), Timestamp::default());
    }

    #[test]
    fn test_statistics() {
        let mut h = Histogram::new(UniformSample::new(100), 15);
        for v in 1..=10 {
            h.update(at(v), v);
        }

        assert_eq!(h.count(), 10);
        assert_eq!(h.min(), 1);
        assert_eq!(h.max(), 10);
        assert_eq!(h.sum(), 55);
        assert_eq!(h.mean(), 5.5);
        assert!((h.variance() - 8.25).abs() < 1e-9);
        assert!((h.percentile(0.5) - 5.5).abs() < 1e-9);
        assert_eq!(h.sample().size(), 10);
    }

    #[test]
    fn test_max_time_only_advances() {
        let mut h = Histogram::new(ExpDecaySample::new(at(0), 10, 0.015, 60), 15);
        h.update(at(100), 1);
        h.update(at(50), 2);

        assert_eq!(h.max_time(), at(100));
        assert!(h.updated_since(at(99)));
        assert!(!h.updated_since(at(100)));
    }

    #[test]
    fn test_stale() {
        let mut h = Histogram::new(UniformSample::new(10), 2);
        h.update(at(0), 1);

        assert!(!h.stale(at(60)));
        assert!(!h.stale(at(120)));
        assert!(h.stale(at(121)));
    }

    #[test]
    fn test_clear_keeps_last_update() {
        let mut h = Histogram::new(UniformSample::new(10), 15);
        h.update(at(10), 7);

        h.clear(at(20));

        assert_eq!(h.count(), 0);
        assert_eq!(h.max(), 0);
        assert_eq!(h.max_time(), at(10));
    }

    #[test]
    fn test_summary() {
        let mut h = Histogram::new(UniformSample::new(2000), 15);
        for v in 1..=1000 {
            h.update(at(0), v);
        }

        let s = h.summary();
        assert_eq!(s.min, 1);
        assert_eq!(s.max, 1000);
        assert!((s.p50 - 500.5).abs() < 1e-9);
        assert!((s.p95 - 950.95).abs() < 1e-6);
        assert_eq!(s.sample_size, 1000);
    }

    #[test]
    fn test_snapshot() {
        let mut h = Histogram::new(UniformSample::new(10), 15);
        h.update(at(1), 5);

        let mut snapshot = h.snapshot();
        h.update(at(2), 50);

        assert_eq!(snapshot.max(), 5);
        assert_eq!(snapshot.max_time(), at(1));
        assert_eq!(h.max(), 50);

        let payload = catch_unwind(AssertUnwindSafe(|| snapshot.update(at(3), 1))).unwrap_err();
        assert_eq!(
            payload.downcast_ref::<MetricError>(),
            Some(&MetricError::OperationOnSnapshot { op: "update" })
        );
    }

    #[test]
    fn test_nil_histogram() {
        let mut h = Histogram::new(NilSample, 15);
        h.update(at(5), 100);

        assert_eq!(h.count(), 0);
        assert_eq!(h.summary(), HistogramSummary::default());
        assert_eq!(h.max_time(), at(5));
    }

    #[test]
    fn test_as_metric() {
        let mut metrics: Vec<Box<dyn Metric>> = vec![
            Box::new(Histogram::new(UniformSample::new(10), 15)),
            Box::new(Histogram::new(ExpDecaySample::new(at(0), 10, 0.015, 60), 15)),
        ];

        for m in &mut metrics {
            m.update(at(30), 3);
            assert_eq!(m.key_count(), 10);
            assert_eq!(m.max_time(), at(30));
            assert!(!m.stale(at(60)));
        }
    }
}
