//! Read-only and no-op sample variants

use super::Sample;
use crate::time::Timestamp;
use crate::traits::snapshot_fault;

/// Frozen copy of a sample's count and retained values
///
/// Readers behave exactly like the sample it was taken from at the time of
/// the snapshot. `update`, `clear` and `zero_out` are illegal and abort the
/// call with [`MetricError::OperationOnSnapshot`](crate::MetricError).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleSnapshot {
    count: u64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    pub fn new(count: u64, values: Vec<i64>) -> Self {
        Self { count, values }
    }

    /// Borrow the frozen values without copying.
    pub fn as_slice(&self) -> &[i64] {
        &self.values
    }
}

impl Sample for SampleSnapshot {
    fn update(&mut self, _t: Timestamp, _value: i64) {
        snapshot_fault("update")
    }

    fn values(&self) -> Vec<i64> {
        self.values.clone()
    }

    fn clear(&mut self, _t: Timestamp) {
        snapshot_fault("clear")
    }

    fn zero_out(&mut self) {
        snapshot_fault("zero_out")
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.values.len()
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.clone()
    }
}

/// Sample that records nothing
///
/// Every reader returns zero. Hand one to a histogram where metrics are
/// disabled instead of branching at each call site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NilSample;

impl Sample for NilSample {
    fn update(&mut self, _t: Timestamp, _value: i64) {}

    fn values(&self) -> Vec<i64> {
        Vec::new()
    }

    fn clear(&mut self, _t: Timestamp) {}

    fn zero_out(&mut self) {}

    fn count(&self) -> u64 {
        0
    }

    fn size(&self) -> usize {
        0
    }

    fn capacity(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::UniformSample;
    use crate::MetricError;
    use chrono::Utc;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn fault_of(f: impl FnOnce()) -> Option<MetricError> {
        let payload = catch_unwind(AssertUnwindSafe(f)).err()?;
        payload.downcast_ref::<MetricError>().cloned()
    }

    #[test]
    fn test_snapshot_is_detached() {
        let sample = UniformSample::with_seed(10, 1);
        let now = Utc::now();
        for v in [3, 1, 2] {
            sample.update(now, v);
        }

        let snapshot = sample.snapshot();
        sample.update(now, 100);

        assert_eq!(snapshot.count(), 3);
        assert_eq!(snapshot.as_slice(), &[3, 1, 2]);
        assert_eq!(snapshot.max(), 3);
        assert_eq!(snapshot.percentile(0.5), 2.0);
        assert_eq!(sample.count(), 4);
    }

    #[test]
    fn test_snapshot_mutators_fault() {
        let mut snapshot = SampleSnapshot::new(1, vec![1]);
        let now = Utc::now();

        assert_eq!(
            fault_of(|| snapshot.update(now, 2)),
            Some(MetricError::OperationOnSnapshot { op: "update" })
        );
        assert_eq!(
            fault_of(|| snapshot.clear(now)),
            Some(MetricError::OperationOnSnapshot { op: "clear" })
        );
        assert_eq!(
            fault_of(|| snapshot.zero_out()),
            Some(MetricError::OperationOnSnapshot { op: "zero_out" })
        );
        assert_eq!(snapshot.values(), vec![1]);
    }

    #[test]
    fn test_nil_sample() {
        let mut sample = NilSample;
        sample.update(Utc::now(), 42);

        assert_eq!(sample.count(), 0);
        assert_eq!(sample.size(), 0);
        assert_eq!(sample.max(), 0);
        assert_eq!(sample.mean(), 0.0);
        assert_eq!(sample.percentiles(&[0.5, 0.99]), vec![0.0, 0.0]);
    }
}
