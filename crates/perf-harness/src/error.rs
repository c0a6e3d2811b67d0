//! Error taxonomy for the harness
//!
//! Every variant is fatal: the suite driver stops at the first error and no
//! report document is written for the run.
//!
//! Messages describe only their own layer. The underlying cause is reachable
//! through [`std::error::Error::source`], so print with `{:#}` through
//! `anyhow` to see the whole chain.

use std::path::PathBuf;
use thiserror::Error;

use crate::runner::LifecyclePhase;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to read fixture {}", path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed fixture {}", path.display())]
    FixtureMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fixture {} contains no data", path.display())]
    FixtureEmpty { path: PathBuf },

    #[error("Scenario '{scenario}' failed during {phase}")]
    Hook {
        scenario: String,
        phase: LifecyclePhase,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot start {workers} workers against a pool of capacity {capacity}")]
    WorkerCountExceedsCapacity { workers: usize, capacity: usize },

    #[error("Pool exhausted: requested {requested} handles, {available} available")]
    PoolExhausted { requested: usize, available: usize },

    #[error("Worker {worker} failed")]
    Worker {
        worker: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("Failed to write report {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_hook_cause_printed_once_in_chain() {
        let err = HarnessError::Hook {
            scenario: "TestDeepDecoding".to_string(),
            phase: LifecyclePhase::Setup,
            source: anyhow::anyhow!("fixture went missing"),
        };
        assert_eq!(err.to_string(), "Scenario 'TestDeepDecoding' failed during setup");

        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chain.matches("fixture went missing").count(), 1);
        assert_eq!(
            chain,
            "Scenario 'TestDeepDecoding' failed during setup: fixture went missing"
        );
    }

    #[test]
    fn test_io_cause_is_source_not_message() {
        let err = HarnessError::ReportWrite {
            path: PathBuf::from("out.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write report out.json");
        assert_eq!(err.source().map(|s| s.to_string()), Some("denied".to_string()));

        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chain.matches("denied").count(), 1);
    }
}
