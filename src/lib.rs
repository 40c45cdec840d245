//! # Flowmetrics
//!
//! In-process application metrics for Rust.
//!
//! Flowmetrics provides the recording side of a metrics library: bounded
//! reservoir samples, histograms over them, moving-average rates and
//! counters. Instrumented code records values; an exporter periodically
//! reads the statistics and ships them wherever it likes.
//!
//! ## Features
//!
//! - **Reservoir Sampling**: Uniform (Algorithm R) and forward-decay samples
//! - **Histograms**: Min, max, mean, variance and percentiles over a sample
//! - **Rates**: 1-, 5- and 15-minute exponentially-weighted moving averages
//! - **Counters**: Lock-free signed counters
//! - **Snapshots**: Frozen read-only copies whose mutators fault
//! - **Nil Variants**: No-op implementations for disabled metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmetrics::prelude::*;
//! use chrono::{TimeDelta, Utc};
//!
//! let start = Utc::now();
//!
//! // Request latency, biased toward the last few minutes
//! let mut latency = Histogram::new(ExpDecaySample::new(start, 1028, 0.015, 60), 15);
//! for ms in [12, 8, 30, 9, 11] {
//!     latency.update(start, ms);
//! }
//! println!("p99 latency: {}ms", latency.percentile(0.99));
//!
//! // Requests per second, ticked by the exporter
//! let mut requests = StandardMeter::new(start, 5, 15);
//! requests.mark(start, 1);
//! requests.crunch_ewma(start + TimeDelta::seconds(5));
//! println!("1m rate: {}/s", requests.rate1());
//! ```
//!
//! ## Time
//!
//! Every mutator takes the timestamp of the event explicitly. Nothing in the
//! crate reads the wall clock, so tests can drive time however they need and
//! exporters control when moving averages advance.
//!
//! ## Registries
//!
//! Metrics of different kinds share the [`Metric`] trait, so a registry can
//! hold them as trait objects:
//!
//! ```rust
//! use flowmetrics::prelude::*;
//! use chrono::Utc;
//!
//! let now = Utc::now();
//! let mut registry: Vec<(&str, Box<dyn Metric + Send>)> = Vec::new();
//! registry.push(("latency", Box::new(Histogram::new(UniformSample::new(1028), 15))));
//! registry.push(("requests", Box::new(StandardMeter::new(now, 5, 15))));
//! registry.push(("in_flight", Box::new(StandardCounter::new(now, 15))));
//!
//! for (_, metric) in registry.iter_mut() {
//!     metric.update(now, 1);
//! }
//! let keys: usize = registry.iter().map(|(_, m)| m.key_count()).sum();
//! assert_eq!(keys, 10 + 4 + 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialize snapshots, summaries and [`MetricsConfig`]

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod counter;
pub mod histogram;
pub mod rate;
pub mod sampling;
pub mod statistics;
pub mod time;
pub mod traits;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::counter::{Counter, CounterSnapshot, NilCounter, StandardCounter};
    pub use crate::histogram::{Histogram, HistogramSummary};
    pub use crate::rate::{
        Ewma, EwmaSnapshot, Meter, MeterSnapshot, NilEwma, NilMeter, StandardEwma, StandardMeter,
    };
    pub use crate::sampling::{ExpDecaySample, NilSample, Sample, SampleSnapshot, UniformSample};
    pub use crate::config::MetricsConfig;
    pub use crate::time::Timestamp;
}

pub use config::MetricsConfig;
pub use time::Timestamp;
pub use traits::{Metric, MetricError};
