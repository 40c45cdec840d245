/// Quantiles in the fixed export set: p50, p75, p95, p99, p99.9.
pub const EXPORT_PERCENTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];

/// The fixed set of statistics an exporter emits for a histogram
///
/// All fields come from one copy of the reservoir, so they are mutually
/// consistent even if the histogram keeps receiving updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramSummary {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub std_dev: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub p99: f64,
    pub p999: f64,
    /// Values retained in the reservoir, not observations ever seen
    pub sample_size: usize,
}

impl HistogramSummary {
    /// Number of statistics in the export set.
    pub const KEY_COUNT: usize = 10;

    /// Summarize a copy of a reservoir's values. Sorts `values` in place.
    pub fn from_values(values: &mut [i64]) -> Self {
        let ps = crate::statistics::percentiles(values, &EXPORT_PERCENTILES);
        Self {
            min: crate::statistics::min(values),
            max: crate::statistics::max(values),
            mean: crate::statistics::mean(values),
            std_dev: crate::statistics::std_dev(values),
            p50: ps[0],
            p75: ps[1],
            p95: ps[2],
            p99: ps[3],
            p999: ps[4],
            sample_size: values.len(),
        }
    }

    /// Convenience: is this summary backed by at least one value?
    pub fn has_data(&self) -> bool {
        self.sample_size > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let summary = HistogramSummary::from_values(&mut []);
        assert_eq!(summary, HistogramSummary::default());
        assert!(!summary.has_data());
    }

    #[test]
    fn test_from_values() {
        let mut values: Vec<i64> = (1..=1000).collect();
        let summary = HistogramSummary::from_values(&mut values);

        assert_eq!(summary.min, 1);
        assert_eq!(summary.max, 1000);
        assert!((summary.mean - 500.5).abs() < 1e-9);
        assert!((summary.p50 - 500.5).abs() < 1e-9);
        assert!((summary.p75 - 750.75).abs() < 1e-9);
        assert!((summary.p999 - 999.999).abs() < 1e-6);
        assert_eq!(summary.sample_size, 1000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let summary = HistogramSummary::from_values(&mut [1, 2, 3]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"p999\":3.0"));
        assert!(json.contains("\"sample_size\":3"));
    }
}
