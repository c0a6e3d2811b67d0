//! Statistical reduction of duration samples
//!
//! The runner hands its sample buffer to [`reduce`], which sorts it and picks
//! a single representative duration; the rest of the distribution is kept
//! only for human-facing output.
//!
//! # Examples
//!
//! ```
//! use perf_harness::stats::{reduce, MedianRule};
//! use std::time::Duration;
//!
//! let samples = vec![
//!     Duration::from_millis(12),
//!     Duration::from_millis(10),
//!     Duration::from_millis(11),
//!     Duration::from_millis(250), // one slow iteration
//! ];
//!
//! let reduction = reduce(&samples, MedianRule::Upper).unwrap();
//! assert!((reduction.representative_secs - 0.012).abs() < 1e-12);
//! println!("p95: {}", reduction.summary.p95);
//! ```

pub mod median;
pub mod percentiles;

pub use median::{reduce, MedianRule, Reduction};
pub use percentiles::{percentile, SampleSummary};
