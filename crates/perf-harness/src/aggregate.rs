//! Throughput aggregation
//!
//! Turns a scenario's expected data size and representative duration into
//! the single figure the report carries.

use serde::{Deserialize, Serialize};

/// Output record for one completed scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Scenario name, copied from the descriptor
    pub name: String,
    /// Representative duration in seconds
    pub representative_secs: f64,
    /// Bytes per second, or iterations per second for unsized scenarios
    pub ops_per_sec: f64,
}

/// `expected_data_size / duration`, or `1 / duration` when the scenario has
/// no natural size.
///
/// Returns `None` when the duration is not strictly positive and finite.
pub fn throughput(expected_data_size: u64, representative_secs: f64) -> Option<f64> {
    if representative_secs <= 0.0 || !representative_secs.is_finite() {
        return None;
    }
    let numerator = if expected_data_size == 0 {
        1.0
    } else {
        expected_data_size as f64
    };
    Some(numerator / representative_secs)
}

/// Build the output record, or `None` if the duration cannot carry a rate.
///
/// # Examples
///
/// ```
/// use perf_harness::aggregate::aggregate;
///
/// let record = aggregate("TestRunCommand", 160_000, 0.5).unwrap();
/// assert_eq!(record.ops_per_sec, 320_000.0);
///
/// assert!(aggregate("TooFast", 100, 0.0).is_none());
/// ```
pub fn aggregate(
    name: &str,
    expected_data_size: u64,
    representative_secs: f64,
) -> Option<ResultRecord> {
    let ops_per_sec = throughput(expected_data_size, representative_secs)?;
    Some(ResultRecord {
        name: name.to_string(),
        representative_secs,
        ops_per_sec,
    })
}
