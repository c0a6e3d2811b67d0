//! Percentile calculations over duration samples.
//!
//! Samples are seconds as `f64`. Callers that already hold a sorted buffer
//! use the `*_sorted` entry points to avoid copying it again.

use std::cmp::Ordering;

/// Sort a sample buffer ascending in place.
///
/// NaN never occurs for durations; it is ordered as equal if it does.
pub fn sort_samples(samples: &mut [f64]) {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Calculate a percentile from unsorted samples.
///
/// Uses linear interpolation between nearest ranks.
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is outside 0..=100
///
/// # Examples
///
/// ```
/// use perf_harness::stats::percentiles::percentile;
///
/// let data = vec![5.0, 1.0, 3.0, 2.0, 4.0];
/// assert_eq!(percentile(&data, 50.0), Some(3.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    let mut sorted = samples.to_vec();
    sort_samples(&mut sorted);
    percentile_sorted(&sorted, p)
}

/// Same as [`percentile`], for a slice that is already sorted ascending.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        Some(lower_value + fraction * (upper_value - lower_value))
    }
}

/// Spread of a scenario's duration samples, for human-facing output.
///
/// Not part of the persisted report.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub min: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl SampleSummary {
    /// Summarize a sorted, non-empty sample slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use perf_harness::stats::percentiles::SampleSummary;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    /// let summary = SampleSummary::from_sorted(&data).unwrap();
    /// assert_eq!(summary.count, 10);
    /// assert_eq!(summary.mean, 5.5);
    /// assert_eq!(summary.min, 1.0);
    /// assert_eq!(summary.max, 10.0);
    /// ```
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let count = sorted.len();
        let min = *sorted.first()?;
        let max = sorted[count - 1];

        let mean = sorted.iter().sum::<f64>() / count as f64;

        // Sample standard deviation
        let variance = if count > 1 {
            sorted.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        } else {
            0.0
        };

        Some(SampleSummary {
            min,
            p50: percentile_sorted(sorted, 50.0)?,
            p95: percentile_sorted(sorted, 95.0)?,
            max,
            mean,
            std_dev: variance.sqrt(),
            count,
        })
    }
}
