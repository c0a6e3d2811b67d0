//! Representative-duration selection.
//!
//! The reducer sorts the sample buffer in place and picks one value from it
//! according to a [`MedianRule`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::percentiles::{percentile_sorted, sort_samples, SampleSummary};

/// How the representative value is chosen from N sorted samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianRule {
    /// Element at `floor(N/2) - 1`, clamped to a valid index.
    ///
    /// Biased low for every N > 2; kept for comparison with older reports.
    Lower,
    /// Element at `floor(N/2)`, clamped to `N - 1`.
    Upper,
    /// Conventional median, interpolating between the two middle elements
    /// when N is even.
    #[default]
    Interpolated,
}

impl MedianRule {
    /// Index picked by the index-based rules, `None` for an empty buffer or
    /// for [`MedianRule::Interpolated`].
    pub fn index(self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let last = len - 1;
        match self {
            MedianRule::Lower => Some((len / 2).saturating_sub(1).min(last)),
            MedianRule::Upper => Some((len / 2).min(last)),
            MedianRule::Interpolated => None,
        }
    }

    /// Pick the representative value from a sorted, non-empty slice.
    pub fn select_sorted(self, sorted: &[f64]) -> Option<f64> {
        match self.index(sorted.len()) {
            Some(i) => Some(sorted[i]),
            None => percentile_sorted(sorted, 50.0),
        }
    }
}

/// Output of the statistic reducer for one scenario
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Representative duration in seconds
    pub representative_secs: f64,
    /// Spread of all samples, for console output
    pub summary: SampleSummary,
}

/// Sort the captured durations and extract the representative value.
///
/// Returns `None` only for an empty buffer; the runner always records at
/// least one sample.
///
/// # Examples
///
/// ```
/// use perf_harness::stats::{reduce, MedianRule};
/// use std::time::Duration;
///
/// let samples = [30, 10, 20].map(Duration::from_millis);
/// let reduction = reduce(&samples, MedianRule::Interpolated).unwrap();
/// assert!((reduction.representative_secs - 0.020).abs() < 1e-12);
/// ```
pub fn reduce(samples: &[Duration], rule: MedianRule) -> Option<Reduction> {
    let mut secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
    sort_samples(&mut secs);

    Some(Reduction {
        representative_secs: rule.select_sorted(&secs)?,
        summary: SampleSummary::from_sorted(&secs)?,
    })
}
