//! Core capability traits shared by every metric family
//!
//! Each family (sampling, rate, counter) defines its own trait for its
//! readers and mutators; [`Metric`] is the narrow surface a registry or an
//! exporter uses to drive any of them uniformly.

use thiserror::Error;

use crate::time::Timestamp;

/// Faults raised by metric types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    /// A mutating operation was called on a read-only snapshot.
    ///
    /// This is a programming error. It is never returned; it is raised as
    /// the panic payload so the offending call aborts.
    #[error("{op} called on a snapshot")]
    OperationOnSnapshot {
        /// Name of the rejected operation
        op: &'static str,
    },
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Abort a mutating call on a snapshot.
///
/// The payload is a [`MetricError::OperationOnSnapshot`], recoverable with
/// `std::panic::catch_unwind` and `downcast_ref::<MetricError>()`.
#[cold]
#[track_caller]
pub(crate) fn snapshot_fault(op: &'static str) -> ! {
    tracing::error!(op, "mutation attempted on a snapshot");
    std::panic::panic_any(MetricError::OperationOnSnapshot { op })
}

/// Uniform surface handed to the external registry and exporter.
///
/// Object safe, so heterogeneous metrics can live in one
/// `Vec<Box<dyn Metric + Send>>`.
pub trait Metric {
    /// Record one observation. Meaning depends on the metric: counters add
    /// `value`, meters mark `value` events, histograms sample `value`.
    fn update(&mut self, t: Timestamp, value: i64);

    /// Latest timestamp passed to an update.
    fn max_time(&self) -> Timestamp;

    /// Whether the metric has been inactive long enough to be skipped.
    fn stale(&self, now: Timestamp) -> bool;

    /// Number of derived statistics an exporter emits for this metric.
    fn key_count(&self) -> usize;

    /// Whether there is anything new to emit relative to `t`.
    fn updated_since(&self, t: Timestamp) -> bool;
}
