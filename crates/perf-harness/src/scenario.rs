//! Scenario descriptors and their lifecycle hooks
//!
//! A scenario is a name, the number of bytes one iteration is expected to
//! move, and an implementation of [`LifecycleHooks`]. Only
//! [`LifecycleHooks::task`] is timed; every other hook defaults to a no-op.
//!
//! # Example
//!
//! ```
//! use perf_harness::scenario::{LifecycleHooks, ScenarioDescriptor, Suite};
//!
//! struct Checksum {
//!     data: Vec<u8>,
//! }
//!
//! impl LifecycleHooks for Checksum {
//!     fn setup(&mut self) -> anyhow::Result<()> {
//!         self.data = vec![7u8; 1 << 20];
//!         Ok(())
//!     }
//!
//!     fn task(&mut self) -> anyhow::Result<()> {
//!         let sum: u64 = self.data.iter().map(|&b| b as u64).sum();
//!         std::hint::black_box(sum);
//!         Ok(())
//!     }
//! }
//!
//! let mut suite = Suite::new();
//! suite.push(ScenarioDescriptor::new("Checksum1MiB", 1 << 20, Checksum { data: Vec::new() }));
//! assert_eq!(suite.len(), 1);
//! ```

use std::fmt;

/// The five lifecycle hooks a scenario plugs into the runner.
///
/// Hooks are called from the suite driver's thread in strict sequence:
/// `setup` once, then `before`/`task`/`after` per iteration, then
/// `teardown` once. Any error is fatal to the whole suite.
pub trait LifecycleHooks: Send {
    /// One-time preparation before the first iteration.
    fn setup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Untimed per-iteration preparation.
    fn before(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// The measured operation. Must not return until all work it started,
    /// including any worker threads, has finished.
    fn task(&mut self) -> anyhow::Result<()>;

    /// Untimed per-iteration cleanup.
    fn after(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// One-time cleanup after the last iteration.
    fn teardown(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Immutable description of one benchmark scenario
pub struct ScenarioDescriptor {
    name: String,
    expected_data_size: u64,
    hooks: Box<dyn LifecycleHooks>,
}

impl ScenarioDescriptor {
    /// Describe a scenario.
    ///
    /// `expected_data_size` is the byte count one iteration moves; pass 0 for
    /// scenarios with no natural size, which are then reported as
    /// iterations per second.
    pub fn new(
        name: impl Into<String>,
        expected_data_size: u64,
        hooks: impl LifecycleHooks + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            expected_data_size,
            hooks: Box::new(hooks),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected_data_size(&self) -> u64 {
        self.expected_data_size
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut dyn LifecycleHooks {
        self.hooks.as_mut()
    }
}

impl fmt::Debug for ScenarioDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioDescriptor")
            .field("name", &self.name)
            .field("expected_data_size", &self.expected_data_size)
            .finish_non_exhaustive()
    }
}

/// Scenarios in declaration order
#[derive(Debug, Default)]
pub struct Suite {
    scenarios: Vec<ScenarioDescriptor>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scenario: ScenarioDescriptor) {
        self.scenarios.push(scenario);
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.iter().map(ScenarioDescriptor::name)
    }
}

impl Extend<ScenarioDescriptor> for Suite {
    fn extend<I: IntoIterator<Item = ScenarioDescriptor>>(&mut self, iter: I) {
        self.scenarios.extend(iter);
    }
}

impl FromIterator<ScenarioDescriptor> for Suite {
    fn from_iter<I: IntoIterator<Item = ScenarioDescriptor>>(iter: I) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Suite {
    type Item = ScenarioDescriptor;
    type IntoIter = std::vec::IntoIter<ScenarioDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.into_iter()
    }
}
