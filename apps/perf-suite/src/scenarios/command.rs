//! Command round-trip scenario

use perf_harness::{LifecycleHooks, ScenarioDescriptor};
use serde_json::{json, Value};

use super::NUM_DOCS;
use crate::loopback::LoopbackClient;

pub const RUN_COMMAND_NAME: &str = "TestRunCommand";
pub const RUN_COMMAND_DATA_SIZE: u64 = 160_000;

/// Sends `{"ismaster": true}` [`NUM_DOCS`] times per iteration.
pub struct RunCommand {
    client: Option<LoopbackClient>,
    command: Value,
}

impl RunCommand {
    pub fn new() -> Self {
        Self {
            client: None,
            command: json!({ "ismaster": true }),
        }
    }
}

impl Default for RunCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleHooks for RunCommand {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.client = Some(LoopbackClient::new(0));
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("client not connected"))?;
        for _ in 0..NUM_DOCS {
            client.command(&self.command)?;
        }
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.client = None;
        Ok(())
    }
}

pub fn run_command() -> ScenarioDescriptor {
    ScenarioDescriptor::new(RUN_COMMAND_NAME, RUN_COMMAND_DATA_SIZE, RunCommand::new())
}
