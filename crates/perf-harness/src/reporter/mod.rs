//! Benchmark result reporting
//!
//! Results are accumulated by the runner and serialized once the suite has
//! finished, never streamed per scenario. File output is written to a
//! sibling temporary file and renamed into place, so an aborted run leaves
//! either no report or the previous complete one.
//!
//! # Output Formats
//!
//! - **Json / JsonPretty**: the persisted report document
//! - **Console**: Human-readable summary table
//! - **Markdown**: Documentation-friendly table
//!
//! # Example
//!
//! ```no_run
//! use perf_harness::reporter::{Reporter, OutputFormat};
//! use perf_harness::runner::BenchmarkResults;
//!
//! # fn example(results: BenchmarkResults) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&results)?;
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&results, "results.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::Result;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::HarnessError;
use crate::runner::BenchmarkResults;

pub use console::ConsoleReporter;
pub use json::{JsonReporter, ReportEntry, ThreadResult};
pub use markdown::MarkdownReporter;

/// Output format for benchmark results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    #[default]
    JsonPretty,
    /// Console output with tables
    Console,
    /// Markdown format for documentation
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            "console" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(HarnessError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Reporter for benchmark results
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report results to stdout
    pub fn report(&self, results: &BenchmarkResults) -> Result<()> {
        let output = self.format_results(results)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write results to a file, replacing it atomically
    pub fn write_to_file<P: AsRef<Path>>(&self, results: &BenchmarkResults, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_results(results)?;
        write_atomic(path, output.as_bytes())?;
        info!("Wrote report to {}", path.display());
        Ok(())
    }

    /// Format results as a string
    pub fn format_results(&self, results: &BenchmarkResults) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(results, false),
            OutputFormat::JsonPretty => JsonReporter::format(results, true),
            OutputFormat::Console => ConsoleReporter::format(results),
            OutputFormat::Markdown => MarkdownReporter::format(results),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), HarnessError> {
    let tmp = temp_path(path);
    let write_err = |source| HarnessError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Err(source) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        write_err(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ResultRecord;
    use crate::runner::ScenarioResult;
    use crate::stats::SampleSummary;

    fn create_test_results() -> BenchmarkResults {
        BenchmarkResults {
            suite_name: "Test Suite".to_string(),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            total_duration_ms: 5000,
            scenario_results: vec![ScenarioResult {
                record: ResultRecord {
                    name: "TestDeepDecoding".to_string(),
                    representative_secs: 0.2,
                    ops_per_sec: 98_200_000.0,
                },
                iterations: 30,
                summary: SampleSummary::from_sorted(&[0.1, 0.2, 0.3]).unwrap(),
            }],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_reporter_json_format() {
        let output = Reporter::new(OutputFormat::Json)
            .format_results(&create_test_results())
            .unwrap();
        assert!(output.contains("\"ops_per_sec\""));
        assert!(output.contains("TestDeepDecoding"));
        assert!(!output.contains("Test Suite"));
    }

    #[test]
    fn test_reporter_console_format() {
        let output = Reporter::new(OutputFormat::Console)
            .format_results(&create_test_results())
            .unwrap();
        assert!(output.contains("Test Suite"));
        assert!(output.contains("TestDeepDecoding"));
    }

    #[test]
    fn test_reporter_markdown_format() {
        let output = Reporter::new(OutputFormat::Markdown)
            .format_results(&create_test_results())
            .unwrap();
        assert!(output.contains("# "));
        assert!(output.contains("Test Suite"));
    }

    #[test]
    fn test_default_format() {
        let reporter = Reporter::default();
        assert_eq!(reporter.format, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_to_file_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        Reporter::default()
            .write_to_file(&create_test_results(), &path)
            .unwrap();

        let written: Vec<ReportEntry> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].name, "TestDeepDecoding");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.json");

        let err = Reporter::default()
            .write_to_file(&create_test_results(), &path)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to write report"));
        assert!(!path.exists());
    }
}
