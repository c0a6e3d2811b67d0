//! Configuration for a benchmark suite run
//!
//! This module provides TOML-based configuration for the adaptive sampling
//! bounds, the scenario selection filter and the fixture/output locations.
//! The configuration is built once at startup and handed to the runner by
//! reference; nothing in it changes while the suite runs.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HarnessError;
use crate::stats::MedianRule;

/// Time bound used for both the minimum and maximum in quick mode.
pub const QUICK_TIME: Duration = Duration::from_secs(5);

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Suite-level settings
    #[serde(default)]
    pub suite: SuiteConfig,
    /// Adaptive stopping rule and statistic selection
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl HarnessConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - The sampling bounds are inconsistent
    ///
    /// # Example
    ///
    /// ```no_run
    /// use perf_harness::config::HarnessConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = HarnessConfig::from_file("perf.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use perf_harness::config::HarnessConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [suite]
    ///     fixture_dir = "data"
    ///     tests = ["TestRunCommand"]
    ///
    ///     [sampling]
    ///     max_iterations = 10
    /// "#;
    /// let config = HarnessConfig::from_str(toml)?;
    /// assert_eq!(config.sampling.max_iterations, 10);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the runner relies on.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.sampling.validate()
    }

    /// The selection filter built from `suite.tests`.
    pub fn filter(&self) -> TestFilter {
        TestFilter::new(self.suite.tests.iter().cloned())
    }
}

/// Suite-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Name of the suite, used in console and markdown output
    #[serde(default = "default_suite_name")]
    pub name: String,
    /// Directory that fixture paths are resolved against
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: PathBuf,
    /// Destination of the report document
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Scenario names to run; empty runs everything
    #[serde(default)]
    pub tests: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            name: default_suite_name(),
            fixture_dir: default_fixture_dir(),
            output: default_output(),
            tests: Vec::new(),
        }
    }
}

fn default_suite_name() -> String {
    "perf-suite".to_string()
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output() -> PathBuf {
    PathBuf::from("results.json")
}

/// Bounds for the adaptive stopping rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Keep iterating at least this long, regardless of iteration count
    #[serde(rename = "min_time_ms", with = "duration_ms", default = "default_min_time")]
    pub min_time: Duration,
    /// Do not start a new iteration once this much time has accumulated
    #[serde(rename = "max_time_ms", with = "duration_ms", default = "default_max_time")]
    pub max_time: Duration,
    /// Iteration cap, applied once `min_time` is satisfied (default: 100)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// How the representative duration is picked from the samples
    #[serde(default)]
    pub median: MedianRule,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_time: default_min_time(),
            max_time: default_max_time(),
            max_iterations: default_max_iterations(),
            median: MedianRule::default(),
        }
    }
}

impl SamplingConfig {
    /// Quick mode: run each scenario for about five seconds.
    ///
    /// Only the time bounds change; the iteration cap and median rule are kept.
    pub fn quick(self) -> Self {
        Self {
            min_time: QUICK_TIME,
            max_time: QUICK_TIME,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.max_iterations == 0 {
            return Err(HarnessError::Config(
                "sampling.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.min_time > self.max_time {
            return Err(HarnessError::Config(format!(
                "sampling.min_time_ms ({}) exceeds sampling.max_time_ms ({})",
                self.min_time.as_millis(),
                self.max_time.as_millis()
            )));
        }
        Ok(())
    }
}

fn default_min_time() -> Duration {
    Duration::from_secs(60)
}

fn default_max_time() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_max_iterations() -> usize {
    100
}

/// Exact-match scenario selection
///
/// With no tokens every scenario is selected. Tokens that match no scenario
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFilter {
    names: Vec<String>,
}

impl TestFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// A filter that selects every scenario.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn selects(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Serde module for serializing/deserializing Duration as milliseconds
mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
