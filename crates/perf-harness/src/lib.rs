//! Microbenchmark harness with adaptive sampling
//!
//! This crate drives named benchmark scenarios through a fixed lifecycle,
//! times only the operation under test, and reduces the per-iteration
//! durations to one throughput figure per scenario.
//!
//! # Features
//!
//! - **Lifecycle hooks**: `setup`, `before`, `task`, `after`, `teardown`, all but `task` optional
//! - **Adaptive sampling**: minimum/maximum wall time and an iteration cap
//! - **Median selection**: lower, upper or interpolated median of the samples
//! - **Fan-out/join**: worker threads over a bounded pool inside one `task()`
//! - **Multiple Output Formats**: JSON report, Console, and Markdown summaries
//!
//! # Example
//!
//! ```no_run
//! use perf_harness::{BenchmarkRunner, HarnessConfig, LifecycleHooks, Reporter, ScenarioDescriptor, Suite};
//!
//! struct Sum(Vec<u64>);
//!
//! impl LifecycleHooks for Sum {
//!     fn setup(&mut self) -> anyhow::Result<()> {
//!         self.0 = (0..10_000).collect();
//!         Ok(())
//!     }
//!
//!     fn task(&mut self) -> anyhow::Result<()> {
//!         std::hint::black_box(self.0.iter().sum::<u64>());
//!         Ok(())
//!     }
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = HarnessConfig::from_file("perf.toml")?;
//!
//! let mut suite = Suite::new();
//! suite.push(ScenarioDescriptor::new("TestSum", 80_000, Sum(Vec::new())));
//!
//! let results = BenchmarkRunner::new(&config).run(suite)?;
//! Reporter::default().write_to_file(&results, &config.suite.output)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Runs are configured using TOML files:
//!
//! ```toml
//! [suite]
//! name = "nightly"
//! fixture_dir = "data"
//! output = "results.json"
//! tests = ["TestDeepDecoding"]
//!
//! [sampling]
//! min_time_ms = 60000
//! max_time_ms = 300000
//! max_iterations = 100
//! median = "interpolated"
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fixture;
pub mod orchestrator;
pub mod pool;
pub mod reporter;
pub mod runner;
pub mod sampler;
pub mod scenario;
pub mod stats;

// Re-export main types for convenience
pub use aggregate::ResultRecord;
pub use config::{HarnessConfig, SamplingConfig, TestFilter};
pub use error::HarnessError;
pub use fixture::{FixtureDir, JsonFixture};
pub use orchestrator::FanOut;
pub use pool::{Pooled, ResourcePool};
pub use reporter::{OutputFormat, Reporter};
pub use runner::{BenchmarkResults, BenchmarkRunner, LifecycleRunner, ScenarioResult};
pub use scenario::{LifecycleHooks, ScenarioDescriptor, Suite};
pub use stats::MedianRule;
