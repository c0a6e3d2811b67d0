//! Console output for benchmark results
//!
//! Two channels: progress lines printed while the suite runs, and a summary
//! table once it has finished. Neither is part of the persisted report.

use anyhow::Result;
use std::fmt::Write as _;
use std::io::{self, Write as _};

use crate::runner::{BenchmarkResults, ScenarioResult};

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Progress line for a scenario that is about to run.
    pub fn scenario_started(name: &str) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{:>28}  running", name);
        let _ = out.flush();
    }

    /// Progress line for a scenario that has completed.
    pub fn scenario_finished(result: &ScenarioResult) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", Self::progress_line(result));
        let _ = out.flush();
    }

    fn progress_line(result: &ScenarioResult) -> String {
        format!(
            "{:>28}  {:>14.0} ops/s  median {:.6}s",
            result.record.name, result.record.ops_per_sec, result.record.representative_secs
        )
    }

    /// Format benchmark results for console output
    pub fn format(results: &BenchmarkResults) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                    BENCHMARK RESULTS                          ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Suite:     {}", results.suite_name)?;
        writeln!(output, "Started:   {}", results.started_at)?;
        writeln!(output, "Duration:  {}ms", results.total_duration_ms)?;
        writeln!(output)?;

        writeln!(
            output,
            "  {:<28} │ {:>6} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>14}",
            "Scenario", "Iters", "Min (s)", "P50 (s)", "P95 (s)", "Max (s)", "Std dev", "ops/s"
        )?;
        writeln!(output, "  {}", "─".repeat(120))?;

        for scenario in &results.scenario_results {
            Self::format_scenario(&mut output, scenario)?;
        }

        if !results.skipped.is_empty() {
            writeln!(output)?;
            writeln!(output, "Skipped (zero duration):")?;
            for name in &results.skipped {
                writeln!(output, "  • {}", name)?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_scenario(output: &mut String, scenario: &ScenarioResult) -> Result<()> {
        let summary = &scenario.summary;
        writeln!(
            output,
            "  {:<28} │ {:>6} │ {:>10.6} │ {:>10.6} │ {:>10.6} │ {:>10.6} │ {:>10.6} │ {:>14.0}",
            scenario.record.name,
            scenario.iterations,
            summary.min,
            summary.p50,
            summary.p95,
            summary.max,
            summary.std_dev,
            scenario.record.ops_per_sec
        )?;
        Ok(())
    }
}
