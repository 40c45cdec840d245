//! Distribution statistics backed by a reservoir sample
//!
//! A [`Histogram`] owns exactly one [`Sample`](crate::sampling::Sample) and
//! derives min/max/mean/variance/percentiles from its current contents. The
//! sampling strategy is picked by whoever constructs the histogram.
//!
//! # Example
//!
//! ```
//! use flowmetrics::histogram::Histogram;
//! use flowmetrics::sampling::ExpDecaySample;
//! use chrono::{TimeDelta, Utc};
//!
//! let start = Utc::now();
//! let mut latency = Histogram::new(ExpDecaySample::new(start, 1028, 0.015, 60), 15);
//!
//! for i in 0..100 {
//!     latency.update(start + TimeDelta::milliseconds(i * 10), i);
//! }
//!
//! let summary = latency.summary();
//! assert_eq!(summary.max, 99);
//! assert_eq!(summary.sample_size, 100);
//! ```

mod standard;
mod summary;

pub use standard::Histogram;
pub use summary::{HistogramSummary, EXPORT_PERCENTILES};
