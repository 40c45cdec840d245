//! Construction defaults for metric instances
//!
//! A [`MetricsConfig`] carries the knobs shared by every metric a registry
//! creates and builds validated instances from them. With the `serde`
//! feature it can be loaded from any serde format; missing fields take
//! their defaults.
//!
//! Disabled metrics are an explicit construction choice: build a
//! [`NilCounter`](crate::counter::NilCounter),
//! [`NilMeter`](crate::rate::NilMeter) or a histogram over
//! [`NilSample`](crate::sampling::NilSample) instead of a standard one.

use tracing::warn;

use crate::counter::StandardCounter;
use crate::histogram::Histogram;
use crate::rate::StandardMeter;
use crate::sampling::{
    ExpDecaySample, UniformSample, DEFAULT_ALPHA, DEFAULT_RESCALE_THRESHOLD_MINUTES,
    DEFAULT_RESERVOIR_SIZE, MAX_WINDOW_EXPONENT,
};
use crate::time::Timestamp;
use crate::traits::MetricError;

/// Default inactivity before a metric is skipped by exporters.
pub const DEFAULT_STALE_THRESHOLD_MINUTES: u32 = 15;

/// Default spacing between EWMA crunches on the export path.
pub const DEFAULT_EWMA_INTERVAL_SECS: u32 = 5;

/// Shared construction parameters
///
/// # Example
///
/// ```
/// use flowmetrics::config::MetricsConfig;
/// use flowmetrics::sampling::Sample;
/// use chrono::Utc;
///
/// let config = MetricsConfig {
///     reservoir_size: 256,
///     ..MetricsConfig::default()
/// };
///
/// let histogram = config.exp_decay_histogram(Utc::now()).unwrap();
/// assert_eq!(histogram.sample().capacity(), 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MetricsConfig {
    /// Maximum values retained by a histogram's reservoir
    pub reservoir_size: usize,
    /// Forward-decay rate per second for exponentially-decaying reservoirs
    pub alpha: f64,
    /// Minutes between priority renormalizations
    pub rescale_threshold_minutes: u32,
    /// Minutes without updates before a metric is stale
    pub stale_threshold_minutes: u32,
    /// Seconds between EWMA crunches on the export path
    pub ewma_interval_secs: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            reservoir_size: DEFAULT_RESERVOIR_SIZE,
            alpha: DEFAULT_ALPHA,
            rescale_threshold_minutes: DEFAULT_RESCALE_THRESHOLD_MINUTES,
            stale_threshold_minutes: DEFAULT_STALE_THRESHOLD_MINUTES,
            ewma_interval_secs: DEFAULT_EWMA_INTERVAL_SECS,
        }
    }
}

impl MetricsConfig {
    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), MetricError> {
        let problem = if self.reservoir_size == 0 {
            Some("reservoir_size must be positive")
        } else if !(self.alpha.is_finite() && self.alpha > 0.0) {
            Some("alpha must be a positive finite number")
        } else if self.rescale_threshold_minutes == 0 {
            Some("rescale_threshold_minutes must be positive")
        } else if self.alpha * f64::from(self.rescale_threshold_minutes) * 60.0
            > MAX_WINDOW_EXPONENT
        {
            Some("alpha * rescale_threshold_minutes overflows decay priorities")
        } else if self.ewma_interval_secs == 0 {
            Some("ewma_interval_secs must be positive")
        } else {
            None
        };

        match problem {
            Some(msg) => {
                warn!(config = ?self, "{}", msg);
                Err(MetricError::InvalidConfig(msg.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Histogram over a uniform reservoir.
    pub fn uniform_histogram(&self) -> Result<Histogram<UniformSample>, MetricError> {
        self.validate()?;
        Ok(Histogram::new(
            UniformSample::new(self.reservoir_size),
            self.stale_threshold_minutes,
        ))
    }

    /// Histogram over a forward-decay reservoir anchored at `t`.
    pub fn exp_decay_histogram(
        &self,
        t: Timestamp,
    ) -> Result<Histogram<ExpDecaySample>, MetricError> {
        self.validate()?;
        Ok(Histogram::new(
            ExpDecaySample::new(
                t,
                self.reservoir_size,
                self.alpha,
                self.rescale_threshold_minutes,
            ),
            self.stale_threshold_minutes,
        ))
    }

    pub fn meter(&self, t: Timestamp) -> Result<StandardMeter, MetricError> {
        self.validate()?;
        Ok(StandardMeter::new(
            t,
            self.ewma_interval_secs,
            self.stale_threshold_minutes,
        ))
    }

    pub fn counter(&self, t: Timestamp) -> Result<StandardCounter, MetricError> {
        self.validate()?;
        Ok(StandardCounter::new(t, self.stale_threshold_minutes))
    }
}
