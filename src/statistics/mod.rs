//! Summary statistics over sampled values
//!
//! Pure functions shared by every [`Sample`](crate::sampling::Sample)
//! implementation. They operate on an owned snapshot of the reservoir, so no
//! lock is held while they run.
//!
//! # Example
//!
//! ```
//! use flowmetrics::statistics;
//!
//! let mut values = vec![2, 4, 4, 4, 5, 5, 7, 9];
//!
//! assert_eq!(statistics::mean(&values), 5.0);
//! assert_eq!(statistics::std_dev(&values), 2.0);
//! assert_eq!(statistics::percentile(&mut values, 1.0), 9.0);
//! ```

mod summary;

pub use summary::{max, mean, min, percentile, percentiles, std_dev, sum, variance};
