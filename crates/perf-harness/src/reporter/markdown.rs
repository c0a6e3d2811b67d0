//! Markdown reporter for benchmark results

use anyhow::Result;
use std::fmt::Write;

use crate::runner::BenchmarkResults;

pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(results: &BenchmarkResults) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# {}", results.suite_name)?;
        writeln!(output)?;
        writeln!(
            output,
            "Started {} · {} ms total",
            results.started_at, results.total_duration_ms
        )?;
        writeln!(output)?;
        writeln!(output, "| Scenario | Iterations | Median (s) | Mean (s) | P95 (s) | ops/s |")?;
        writeln!(output, "|---|---:|---:|---:|---:|---:|")?;

        for scenario in &results.scenario_results {
            writeln!(
                output,
                "| {} | {} | {:.6} | {:.6} | {:.6} | {:.0} |",
                scenario.record.name,
                scenario.iterations,
                scenario.record.representative_secs,
                scenario.summary.mean,
                scenario.summary.p95,
                scenario.record.ops_per_sec
            )?;
        }

        if !results.skipped.is_empty() {
            writeln!(output)?;
            writeln!(output, "Skipped (zero duration): {}", results.skipped.join(", "))?;
        }

        Ok(output)
    }
}
