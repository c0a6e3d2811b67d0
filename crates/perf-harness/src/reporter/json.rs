//! JSON report document
//!
//! The persisted shape is fixed for downstream consumers:
//!
//! ```json
//! [
//!   { "name": "TestFlatEncoding", "results": { "1": { "ops_per_sec": 123.4 } } }
//! ]
//! ```
//!
//! The `"1"` key stands for a single-threaded measurement and is kept even
//! though the harness only ever writes that one entry.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::ResultRecord;
use crate::runner::BenchmarkResults;

const SINGLE_THREAD_KEY: &str = "1";

/// Throughput measured at one thread count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadResult {
    pub ops_per_sec: f64,
}

/// One scenario's entry in the report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub results: BTreeMap<String, ThreadResult>,
}

impl From<&ResultRecord> for ReportEntry {
    fn from(record: &ResultRecord) -> Self {
        let mut results = BTreeMap::new();
        results.insert(
            SINGLE_THREAD_KEY.to_string(),
            ThreadResult {
                ops_per_sec: record.ops_per_sec,
            },
        );
        Self {
            name: record.name.clone(),
            results,
        }
    }
}

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Build the ordered list of report entries.
    pub fn document(results: &BenchmarkResults) -> Vec<ReportEntry> {
        results.records().map(ReportEntry::from).collect()
    }

    /// Format benchmark results as the report document
    pub fn format(results: &BenchmarkResults, pretty: bool) -> Result<String> {
        let document = Self::document(results);
        let output = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(output)
    }
}
