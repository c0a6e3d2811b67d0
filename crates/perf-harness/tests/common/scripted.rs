//! Scripted scenarios that log every hook call

#![allow(dead_code)]

use parking_lot::Mutex;
use perf_harness::config::{HarnessConfig, SamplingConfig};
use perf_harness::stats::MedianRule;
use perf_harness::LifecycleHooks;
use std::sync::Arc;
use std::time::Duration;

pub type HookLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> HookLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Logs `"<name>:<hook>"` for every call and optionally fails in `task`.
pub struct Scripted {
    name: String,
    log: HookLog,
    fail_task: bool,
}

impl Scripted {
    pub fn new(name: &str, log: &HookLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
            fail_task: false,
        }
    }

    pub fn failing(name: &str, log: &HookLog) -> Self {
        Self {
            fail_task: true,
            ..Self::new(name, log)
        }
    }

    fn hit(&self, hook: &str) {
        self.log.lock().push(format!("{}:{}", self.name, hook));
    }
}

impl LifecycleHooks for Scripted {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.hit("setup");
        Ok(())
    }

    fn before(&mut self) -> anyhow::Result<()> {
        self.hit("before");
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        self.hit("task");
        if self.fail_task {
            anyhow::bail!("{} task failed", self.name);
        }
        std::thread::sleep(Duration::from_millis(1));
        Ok(())
    }

    fn after(&mut self) -> anyhow::Result<()> {
        self.hit("after");
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.hit("teardown");
        Ok(())
    }
}

/// A config that runs each scenario for a handful of short iterations.
pub fn fast_config(tests: &[&str]) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.suite.name = "integration".to_string();
    config.suite.tests = tests.iter().map(|t| t.to_string()).collect();
    config.sampling = SamplingConfig {
        min_time: Duration::from_millis(2),
        max_time: Duration::from_millis(50),
        max_iterations: 3,
        median: MedianRule::Interpolated,
    };
    config
}

/// Scenario names that reached `setup`, in order.
pub fn started(log: &HookLog) -> Vec<String> {
    log.lock()
        .iter()
        .filter_map(|entry| entry.strip_suffix(":setup").map(str::to_string))
        .collect()
}
