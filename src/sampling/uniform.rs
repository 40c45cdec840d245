//! Uniform reservoir sampling (Algorithm R)
//!
//! Every observation in the stream has the same probability of being in the
//! reservoir: `capacity / n` after `n` observations.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Sample, SampleSnapshot};
use crate::time::Timestamp;

#[derive(Debug)]
struct Reservoir {
    /// Number of observations seen since the last clear
    count: u64,
    values: Vec<i64>,
    rng: StdRng,
}

/// Uniform sample using Vitter's Algorithm R
///
/// # Algorithm
///
/// 1. Fill the reservoir with the first `capacity` observations
/// 2. For the n-th observation after that:
///    - Draw `j` uniformly in `[0, n)`
///    - If `j < capacity`, overwrite slot `j`
///
/// # Thread Safety
///
/// Every operation, reads included, runs under one internal mutex, so the
/// inherent methods take `&self` and a single sample can be shared by many
/// producers through an `Arc`. Statistics are computed on a copy taken
/// under the lock, never while holding it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use flowmetrics::sampling::UniformSample;
/// use chrono::Utc;
///
/// let sample = Arc::new(UniformSample::new(100));
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let sample = Arc::clone(&sample);
///         std::thread::spawn(move || {
///             for v in 0..1000 {
///                 sample.update(Utc::now(), v);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(sample.count(), 4000);
/// assert_eq!(sample.size(), 100);
/// ```
#[derive(Debug)]
pub struct UniformSample {
    capacity: usize,
    reservoir: Mutex<Reservoir>,
}

impl UniformSample {
    /// Create a sample retaining at most `capacity` values, seeded from
    /// system entropy.
    ///
    /// # Panics
    ///
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// Create a sample with a fixed seed, for reproducible selection.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        assert!(capacity > 0, "capacity must be positive");

        Self {
            capacity,
            reservoir: Mutex::new(Reservoir {
                count: 0,
                values: Vec::with_capacity(capacity),
                rng,
            }),
        }
    }

    /// Record one observation. The timestamp is ignored.
    pub fn update(&self, _t: Timestamp, value: i64) {
        let mut r = self.reservoir.lock();
        r.count += 1;

        if r.values.len() < self.capacity {
            r.values.push(value);
        } else {
            let n = r.count;
            let j = r.rng.gen_range(0..n);
            if j < self.capacity as u64 {
                r.values[j as usize] = value;
            }
        }
    }

    /// Copy of the retained values.
    pub fn values(&self) -> Vec<i64> {
        self.reservoir.lock().values.clone()
    }

    /// Empty the reservoir and reset the count.
    pub fn clear(&self, _t: Timestamp) {
        let mut r = self.reservoir.lock();
        r.count = 0;
        r.values.clear();
    }

    /// Drop the retained values, keeping the count.
    pub fn zero_out(&self) {
        self.reservoir.lock().values.clear();
    }

    /// Observations seen since the last clear.
    pub fn count(&self) -> u64 {
        self.reservoir.lock().count
    }

    /// Values currently retained.
    pub fn size(&self) -> usize {
        self.reservoir.lock().values.len()
    }

    /// Maximum number of retained values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Probability that any given observation is currently retained.
    pub fn sampling_probability(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            (self.capacity as f64 / count as f64).min(1.0)
        }
    }

    /// Count and values read under a single lock acquisition.
    pub fn snapshot(&self) -> SampleSnapshot {
        let r = self.reservoir.lock();
        SampleSnapshot::new(r.count, r.values.clone())
    }
}

impl Sample for UniformSample {
    fn update(&mut self, t: Timestamp, value: i64) {
        UniformSample::update(self, t, value);
    }

    fn values(&self) -> Vec<i64> {
        UniformSample::values(self)
    }

    fn clear(&mut self, t: Timestamp) {
        UniformSample::clear(self, t);
    }

    fn zero_out(&mut self) {
        UniformSample::zero_out(self);
    }

    fn count(&self) -> u64 {
        UniformSample::count(self)
    }

    fn size(&self) -> usize {
        UniformSample::size(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn snapshot(&self) -> SampleSnapshot {
        UniformSample::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    #[test]
    fn test_basic() {
        let sample = UniformSample::with_seed(3, 42);
        let now = Utc::now();

        for v in 1..=5 {
            sample.update(now, v);
        }

        assert_eq!(sample.size(), 3);
        assert_eq!(sample.count(), 5);
        for v in sample.values() {
            assert!((1..=5).contains(&v));
        }
    }

    #[test]
    fn test_underfilled() {
        let sample = UniformSample::with_seed(10, 42);
        let now = Utc::now();

        for v in 0..5 {
            sample.update(now, v);
        }

        assert_eq!(sample.size(), 5);
        assert_eq!(sample.values(), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample.sampling_probability(), 1.0);
    }

    #[test]
    fn test_reproducibility() {
        let s1 = UniformSample::with_seed(5, 42);
        let s2 = UniformSample::with_seed(5, 42);
        let now = Utc::now();

        for v in 0..100 {
            s1.update(now, v);
            s2.update(now, v);
        }

        assert_eq!(s1.values(), s2.values());
    }

    #[test]
    fn test_uniformity() {
        // Each of 10 observations should land in a 1-slot reservoir ~10% of the time
        let mut counts = [0usize; 10];
        let iterations = 10_000;
        let now = Utc::now();

        for i in 0..iterations {
            let sample = UniformSample::with_seed(1, i as u64);
            for v in 0..10 {
                sample.update(now, v);
            }
            counts[sample.values()[0] as usize] += 1;
        }

        let expected = iterations / 10;
        for (i, &count) in counts.iter().enumerate() {
            let deviation = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(
                deviation < 0.1,
                "Item {} appeared {} times (expected ~{})",
                i,
                count,
                expected
            );
        }
    }

    #[test]
    fn test_clear() {
        let mut sample = UniformSample::with_seed(5, 1);
        let now = Utc::now();
        for v in 0..10 {
            sample.update(now, v);
        }

        Sample::clear(&mut sample, now);

        assert!(Sample::is_empty(&sample));
        assert_eq!(Sample::count(&sample), 0);
        assert_eq!(Sample::mean(&sample), 0.0);
    }

    #[test]
    fn test_zero_out_keeps_count() {
        let sample = UniformSample::with_seed(5, 1);
        let now = Utc::now();
        for v in 0..10 {
            sample.update(now, v);
        }

        sample.zero_out();

        assert_eq!(sample.size(), 0);
        assert_eq!(sample.count(), 10);
    }

    #[test]
    fn test_values_is_a_copy() {
        let sample = UniformSample::with_seed(5, 1);
        let now = Utc::now();
        sample.update(now, 1);

        let mut copy = sample.values();
        copy[0] = 99;
        copy.push(100);

        assert_eq!(sample.values(), vec![1]);
    }

    #[test]
    fn test_statistics_through_trait() {
        let sample = UniformSample::with_seed(100, 7);
        let now = Utc::now();
        for v in [2, 4, 4, 4, 5, 5, 7, 9] {
            sample.update(now, v);
        }

        assert_eq!(Sample::min(&sample), 2);
        assert_eq!(Sample::max(&sample), 9);
        assert_eq!(Sample::sum(&sample), 40);
        assert_eq!(Sample::mean(&sample), 5.0);
        assert_eq!(Sample::std_dev(&sample), 2.0);
        assert_eq!(Sample::percentile(&sample, 1.0), 9.0);
    }

    #[test]
    #[should_panic(expected = "capacity must be positive")]
    fn test_zero_capacity() {
        let _ = UniformSample::new(0);
    }

    proptest! {
        #[test]
        fn proptest_underfilled_keeps_everything(
            values in prop::collection::vec(any::<i64>(), 0..64),
            headroom in 0usize..16,
        ) {
            let capacity = values.len().max(1) + headroom;
            let sample = UniformSample::new(capacity);
            let now = Utc::now();
            for &v in &values {
                sample.update(now, v);
            }

            prop_assert_eq!(sample.size(), values.len());
            prop_assert_eq!(sample.count(), values.len() as u64);
            prop_assert_eq!(sample.values(), values);
        }

        #[test]
        fn proptest_size_never_exceeds_capacity(
            capacity in 1usize..32,
            n in 0usize..500,
        ) {
            let sample = UniformSample::new(capacity);
            let now = Utc::now();
            for v in 0..n {
                sample.update(now, v as i64);
            }

            prop_assert_eq!(sample.size(), n.min(capacity));
            prop_assert_eq!(sample.count(), n as u64);
        }
    }
}
