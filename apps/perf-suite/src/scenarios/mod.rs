//! The built-in scenario catalogue, in run order

pub mod command;
pub mod json;
pub mod parallel;

use perf_harness::{FixtureDir, HarnessError, Suite};

/// Documents encoded or decoded, or commands sent, per `task()` call.
pub const NUM_DOCS: usize = 10_000;

/// Every built-in scenario.
///
/// Fails when a parallel scenario asks for more workers than its pool holds,
/// before any scenario has run.
pub fn build_suite(fixtures: &FixtureDir) -> Result<Suite, HarnessError> {
    let mut suite: Suite = json::scenarios(fixtures).collect();
    suite.push(command::run_command());
    suite.extend(parallel::scenarios()?);
    Ok(suite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalogue_order() {
        let suite = build_suite(&FixtureDir::new("data")).unwrap();
        let names: Vec<&str> = suite.names().collect();
        assert_eq!(
            names,
            vec![
                "TestFlatEncoding",
                "TestDeepEncoding",
                "TestFullEncoding",
                "TestFlatDecoding",
                "TestDeepDecoding",
                "TestFullDecoding",
                "TestRunCommand",
                "Parallel/Pool/Threads:1",
                "Parallel/Pool/Threads:10",
                "Parallel/Pool/Threads:100",
                "Parallel/Single/Threads:1",
                "Parallel/Single/Threads:10",
                "Parallel/Single/Threads:100",
            ]
        );
    }
}
