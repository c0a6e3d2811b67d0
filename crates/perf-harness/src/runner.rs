//! Suite driver and per-scenario lifecycle runner
//!
//! The suite driver walks scenarios in declaration order, one at a time, and
//! hands each selected scenario to a fresh [`LifecycleRunner`]:
//!
//! ```text
//!   Idle ──setup()──▶ SetupDone ──▶ Iterating ──teardown()──▶ TornDown ──▶ Reported
//!                                   │      ▲
//!                                   └──────┘
//!                     before(); ⏱ task() ⏱; after()   (while the sampler says so)
//! ```
//!
//! Only `task()` is timed. The first hook error ends the whole suite run:
//! no later scenario starts and the caller gets no results to report.
//!
//! # Example
//!
//! ```no_run
//! use perf_harness::{HarnessConfig, BenchmarkRunner, Suite};
//!
//! # fn example(suite: Suite) -> anyhow::Result<()> {
//! let config = HarnessConfig::from_file("perf.toml")?;
//! let results = BenchmarkRunner::new(&config).run(suite)?;
//!
//! for result in &results.scenario_results {
//!     println!("{}: {:.0} ops/s", result.record.name, result.record.ops_per_sec);
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::{aggregate, ResultRecord};
use crate::config::{HarnessConfig, SamplingConfig};
use crate::error::HarnessError;
use crate::reporter::ConsoleReporter;
use crate::sampler::AdaptiveSampler;
use crate::scenario::{LifecycleHooks, ScenarioDescriptor, Suite};
use crate::stats::{reduce, SampleSummary};

/// Lifecycle hook names, used in errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Setup,
    Before,
    Task,
    After,
    Teardown,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecyclePhase::Setup => "setup",
            LifecyclePhase::Before => "before",
            LifecyclePhase::Task => "task",
            LifecyclePhase::After => "after",
            LifecyclePhase::Teardown => "teardown",
        };
        f.write_str(name)
    }
}

/// States of one scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    SetupDone,
    Iterating,
    TornDown,
    Reported,
}

impl LifecycleState {
    fn can_advance_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Idle, SetupDone) | (SetupDone, Iterating) | (Iterating, TornDown) | (TornDown, Reported)
        )
    }
}

/// Results from a complete suite run
#[derive(Debug, Clone)]
pub struct BenchmarkResults {
    /// Name of the suite
    pub suite_name: String,
    /// RFC 3339 timestamp of the run start
    pub started_at: String,
    /// Wall-clock duration of the whole run
    pub total_duration_ms: u64,
    /// One entry per completed scenario, in run order
    pub scenario_results: Vec<ScenarioResult>,
    /// Scenarios whose representative duration was zero and carry no rate
    pub skipped: Vec<String>,
}

impl BenchmarkResults {
    pub fn new(suite_name: impl Into<String>, started_at: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            started_at: started_at.into(),
            total_duration_ms: 0,
            scenario_results: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// File one scenario's outcome.
    ///
    /// A scenario without a result had a zero representative duration; it is
    /// listed in `skipped` and left out of the report.
    pub fn record(&mut self, name: &str, outcome: Option<ScenarioResult>) -> Option<&ScenarioResult> {
        match outcome {
            Some(result) => {
                info!(
                    "{}: {} iterations, median {:.6}s, {:.0} ops/s",
                    result.record.name,
                    result.iterations,
                    result.record.representative_secs,
                    result.record.ops_per_sec
                );
                self.scenario_results.push(result);
                self.scenario_results.last()
            }
            None => {
                warn!("{}: representative duration is zero, no throughput recorded", name);
                self.skipped.push(name.to_string());
                None
            }
        }
    }

    /// The records that go into the persisted report.
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.scenario_results.iter().map(|r| &r.record)
    }
}

/// Results for a single scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub record: ResultRecord,
    /// Number of timed iterations
    pub iterations: usize,
    /// Distribution of the duration samples, in seconds
    pub summary: SampleSummary,
}

/// Drives one scenario through its lifecycle
#[derive(Debug)]
pub struct LifecycleRunner<'a> {
    sampling: &'a SamplingConfig,
    state: LifecycleState,
}

impl<'a> LifecycleRunner<'a> {
    pub fn new(sampling: &'a SamplingConfig) -> Self {
        Self {
            sampling,
            state: LifecycleState::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    fn advance(&mut self, next: LifecycleState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal lifecycle transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "lifecycle transition");
        self.state = next;
    }

    /// Run the full measured lifecycle.
    ///
    /// Returns `Ok(None)` when the representative duration is zero, so no
    /// meaningful rate exists for the scenario.
    #[instrument(skip(self, scenario), fields(scenario = %scenario.name()))]
    pub fn run(
        &mut self,
        scenario: &mut ScenarioDescriptor,
    ) -> Result<Option<ScenarioResult>, HarnessError> {
        let name = scenario.name().to_string();
        let data_size = scenario.expected_data_size();
        let hooks = scenario.hooks_mut();

        call(&name, LifecyclePhase::Setup, hooks.setup())?;
        self.advance(LifecycleState::SetupDone);

        self.advance(LifecycleState::Iterating);
        let mut sampler = AdaptiveSampler::new(self.sampling);
        while sampler.should_continue() {
            call(&name, LifecyclePhase::Before, hooks.before())?;

            let start = Instant::now();
            let outcome = hooks.task();
            let elapsed = start.elapsed();
            call(&name, LifecyclePhase::Task, outcome)?;
            sampler.record(elapsed);

            call(&name, LifecyclePhase::After, hooks.after())?;
        }

        call(&name, LifecyclePhase::Teardown, hooks.teardown())?;
        self.advance(LifecycleState::TornDown);

        let iterations = sampler.iterations();
        let accumulated = sampler.accumulated();
        let samples = sampler.into_samples();
        let Some(reduction) = reduce(&samples, self.sampling.median) else {
            return Err(HarnessError::Config(format!(
                "scenario '{name}' recorded no samples"
            )));
        };

        debug!(
            iterations,
            accumulated_ms = accumulated.as_millis() as u64,
            representative_secs = reduction.representative_secs,
            "sampling finished"
        );

        let result = aggregate(&name, data_size, reduction.representative_secs).map(|record| {
            ScenarioResult {
                record,
                iterations,
                summary: reduction.summary,
            }
        });
        self.advance(LifecycleState::Reported);
        Ok(result)
    }

    /// Call every hook exactly once with no timing or sampling.
    #[instrument(skip(self, scenario), fields(scenario = %scenario.name()))]
    pub fn run_once(&mut self, scenario: &mut ScenarioDescriptor) -> Result<(), HarnessError> {
        let name = scenario.name().to_string();
        let hooks = scenario.hooks_mut();

        call(&name, LifecyclePhase::Setup, hooks.setup())?;
        self.advance(LifecycleState::SetupDone);
        self.advance(LifecycleState::Iterating);
        run_iteration_untimed(&name, hooks)?;
        call(&name, LifecyclePhase::Teardown, hooks.teardown())?;
        self.advance(LifecycleState::TornDown);
        Ok(())
    }
}

fn run_iteration_untimed(name: &str, hooks: &mut dyn LifecycleHooks) -> Result<(), HarnessError> {
    call(name, LifecyclePhase::Before, hooks.before())?;
    call(name, LifecyclePhase::Task, hooks.task())?;
    call(name, LifecyclePhase::After, hooks.after())
}

fn call(scenario: &str, phase: LifecyclePhase, outcome: anyhow::Result<()>) -> Result<(), HarnessError> {
    outcome.map_err(|source| HarnessError::Hook {
        scenario: scenario.to_string(),
        phase,
        source,
    })
}

/// The suite driver
pub struct BenchmarkRunner<'a> {
    config: &'a HarnessConfig,
    progress: bool,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(config: &'a HarnessConfig) -> Self {
        Self {
            config,
            progress: true,
        }
    }

    /// Enable or disable the console progress lines (on by default).
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    /// Run every selected scenario in declaration order.
    ///
    /// Stops at the first error; nothing is returned for the scenarios that
    /// did complete.
    #[instrument(skip(self, suite), fields(suite = %self.config.suite.name))]
    pub fn run(&self, suite: Suite) -> anyhow::Result<BenchmarkResults> {
        self.config.validate()?;

        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();
        let filter = self.config.filter();
        let sampling = &self.config.sampling;

        info!(
            "Starting suite '{}' with {} scenarios (min {}ms, max {}ms, {} iterations)",
            self.config.suite.name,
            suite.len(),
            sampling.min_time.as_millis(),
            sampling.max_time.as_millis(),
            sampling.max_iterations
        );

        let mut results = BenchmarkResults::new(&self.config.suite.name, started_at);

        for mut scenario in suite {
            if !filter.selects(scenario.name()) {
                debug!("Skipping unselected scenario: {}", scenario.name());
                continue;
            }

            if self.progress {
                ConsoleReporter::scenario_started(scenario.name());
            }

            let outcome = LifecycleRunner::new(sampling)
                .run(&mut scenario)
                .with_context(|| format!("Scenario '{}' aborted the suite", scenario.name()))?;

            if let Some(result) = results.record(scenario.name(), outcome) {
                if self.progress {
                    ConsoleReporter::scenario_finished(result);
                }
            }
        }

        results.total_duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Suite '{}' completed {} scenarios in {}ms",
            results.suite_name,
            results.scenario_results.len(),
            results.total_duration_ms
        );

        Ok(results)
    }

    /// Run each selected scenario's hooks once, untimed.
    ///
    /// Returns the number of scenarios run.
    #[instrument(skip(self, suite), fields(suite = %self.config.suite.name))]
    pub fn run_as_utility(&self, suite: Suite) -> anyhow::Result<usize> {
        let filter = self.config.filter();
        let mut count = 0;

        for mut scenario in suite {
            if !filter.selects(scenario.name()) {
                continue;
            }
            info!("Running scenario once: {}", scenario.name());
            LifecycleRunner::new(&self.config.sampling)
                .run_once(&mut scenario)
                .with_context(|| format!("Scenario '{}' aborted the suite", scenario.name()))?;
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MedianRule;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        log: Log,
        fail_in: Option<LifecyclePhase>,
        before_sleep: Duration,
        task_sleep: Duration,
    }

    impl Recorder {
        fn new(log: &Log) -> Self {
            Self {
                log: Arc::clone(log),
                fail_in: None,
                before_sleep: Duration::ZERO,
                task_sleep: Duration::ZERO,
            }
        }

        fn hit(&mut self, phase: LifecyclePhase) -> anyhow::Result<()> {
            self.log.lock().push(phase.to_string());
            if self.fail_in == Some(phase) {
                anyhow::bail!("injected {phase} failure");
            }
            Ok(())
        }
    }

    impl LifecycleHooks for Recorder {
        fn setup(&mut self) -> anyhow::Result<()> {
            self.hit(LifecyclePhase::Setup)
        }
        fn before(&mut self) -> anyhow::Result<()> {
            std::thread::sleep(self.before_sleep);
            self.hit(LifecyclePhase::Before)
        }
        fn task(&mut self) -> anyhow::Result<()> {
            std::thread::sleep(self.task_sleep);
            self.hit(LifecyclePhase::Task)
        }
        fn after(&mut self) -> anyhow::Result<()> {
            self.hit(LifecyclePhase::After)
        }
        fn teardown(&mut self) -> anyhow::Result<()> {
            self.hit(LifecyclePhase::Teardown)
        }
    }

    fn sampling(max_iterations: usize) -> SamplingConfig {
        SamplingConfig {
            min_time: Duration::ZERO,
            max_time: Duration::from_secs(60),
            max_iterations,
            median: MedianRule::Upper,
        }
    }

    #[test]
    fn test_hook_order_for_three_iterations() {
        let log = Log::default();
        let config = sampling(3);
        let mut scenario = ScenarioDescriptor::new("Order", 0, Recorder::new(&log));

        let mut runner = LifecycleRunner::new(&config);
        let result = runner.run(&mut scenario).unwrap();

        let expected: Vec<String> = std::iter::once("setup")
            .chain(std::iter::repeat(["before", "task", "after"]).take(3).flatten())
            .chain(std::iter::once("teardown"))
            .map(String::from)
            .collect();
        assert_eq!(*log.lock(), expected);
        assert_eq!(runner.state(), LifecycleState::Reported);
        if let Some(result) = result {
            assert_eq!(result.iterations, 3);
        }
    }

    #[test]
    fn test_setup_failure_skips_everything_else() {
        let log = Log::default();
        let config = sampling(3);
        let mut hooks = Recorder::new(&log);
        hooks.fail_in = Some(LifecyclePhase::Setup);
        let mut scenario = ScenarioDescriptor::new("BrokenSetup", 10, hooks);

        let mut runner = LifecycleRunner::new(&config);
        let err = runner.run(&mut scenario).unwrap_err();

        assert!(matches!(
            err,
            HarnessError::Hook { phase: LifecyclePhase::Setup, .. }
        ));
        assert_eq!(*log.lock(), vec!["setup".to_string()]);
        assert_eq!(runner.state(), LifecycleState::Idle);
    }

    #[test]
    fn test_task_failure_stops_without_teardown() {
        let log = Log::default();
        let config = sampling(5);
        let mut hooks = Recorder::new(&log);
        hooks.fail_in = Some(LifecyclePhase::Task);
        let mut scenario = ScenarioDescriptor::new("BrokenTask", 10, hooks);

        let err = LifecycleRunner::new(&config).run(&mut scenario).unwrap_err();

        assert!(err.to_string().contains("BrokenTask"));
        assert!(err.to_string().contains("task"));
        assert_eq!(*log.lock(), vec!["setup", "before", "task"]);
    }

    #[test]
    fn test_only_task_is_timed() {
        let log = Log::default();
        let config = sampling(2);
        let mut hooks = Recorder::new(&log);
        hooks.before_sleep = Duration::from_millis(200);
        hooks.task_sleep = Duration::from_millis(10);
        let mut scenario = ScenarioDescriptor::new("Sleepy", 1_000, hooks);

        let result = LifecycleRunner::new(&config)
            .run(&mut scenario)
            .unwrap()
            .unwrap();

        assert!(result.record.representative_secs >= 0.010);
        assert!(result.record.representative_secs < 0.200);
        assert!(result.record.ops_per_sec > 0.0);
    }

    #[test]
    fn test_run_once_calls_each_hook_once() {
        let log = Log::default();
        let config = sampling(100);
        let mut scenario = ScenarioDescriptor::new("Utility", 0, Recorder::new(&log));

        let mut runner = LifecycleRunner::new(&config);
        runner.run_once(&mut scenario).unwrap();

        assert_eq!(
            *log.lock(),
            vec!["setup", "before", "task", "after", "teardown"]
        );
        assert_eq!(runner.state(), LifecycleState::TornDown);
    }

    #[test]
    fn test_state_transitions() {
        use LifecycleState::*;
        assert!(Idle.can_advance_to(SetupDone));
        assert!(SetupDone.can_advance_to(Iterating));
        assert!(Iterating.can_advance_to(TornDown));
        assert!(TornDown.can_advance_to(Reported));
        assert!(!Idle.can_advance_to(Iterating));
        assert!(!Reported.can_advance_to(Idle));
        assert!(!Iterating.can_advance_to(Iterating));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(LifecyclePhase::Setup.to_string(), "setup");
        assert_eq!(LifecyclePhase::Teardown.to_string(), "teardown");
    }

    fn completed(name: &str, secs: f64) -> ScenarioResult {
        ScenarioResult {
            record: crate::aggregate::aggregate(name, 100, secs).unwrap(),
            iterations: 1,
            summary: SampleSummary::from_sorted(&[secs]).unwrap(),
        }
    }

    #[test]
    fn test_zero_duration_outcome_is_skipped() {
        let mut results = BenchmarkResults::new("suite", "2024-01-01T00:00:00Z");

        assert!(results.record("TestInstant", None).is_none());
        let kept = results.record("TestSlow", Some(completed("TestSlow", 0.5))).unwrap();
        assert_eq!(kept.record.ops_per_sec, 200.0);

        assert_eq!(results.skipped, vec!["TestInstant"]);
        assert_eq!(results.scenario_results.len(), 1);

        let names: Vec<String> = crate::reporter::JsonReporter::document(&results)
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["TestSlow"]);
    }

    #[test]
    fn test_outcomes_keep_run_order() {
        let mut results = BenchmarkResults::new("suite", "2024-01-01T00:00:00Z");
        results.record("B", Some(completed("B", 0.25)));
        results.record("Zero", None);
        results.record("A", Some(completed("A", 1.0)));

        let names: Vec<&str> = results.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(results.skipped, vec!["Zero"]);
    }
}
