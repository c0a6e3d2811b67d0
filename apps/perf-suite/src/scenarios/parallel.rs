//! Parallel ping scenarios
//!
//! `Parallel/Pool/*` shares one bounded pool of clients: `before` checks out
//! one client per worker, `task` fans out the workers, and `after` returns
//! the clients. `Parallel/Single/*` gives each worker its own dedicated
//! client instead, as a baseline without pool contention.
//!
//! Both build the pool or client set in `setup` and warm every client with
//! one ping, so connection setup never lands in a timed iteration.

use perf_harness::{FanOut, HarnessError, LifecycleHooks, Pooled, ResourcePool, ScenarioDescriptor};

use super::NUM_DOCS;
use crate::loopback::LoopbackClient;

/// Clients available to the parallel scenarios.
pub const POOL_CAPACITY: usize = 100;

/// Encoded size of `{"ping": 1}` as a BSON document.
pub const PING_COMMAND_SIZE: u64 = 15;

pub const THREAD_COUNTS: [usize; 3] = [1, 10, 100];

/// Bytes of command traffic per iteration with `workers` threads.
pub fn data_size(workers: usize) -> u64 {
    PING_COMMAND_SIZE * NUM_DOCS as u64 * workers as u64
}

fn fan_out(workers: usize) -> Result<FanOut, HarnessError> {
    FanOut::new(workers, NUM_DOCS, POOL_CAPACITY)
}

fn connect(id: usize) -> anyhow::Result<LoopbackClient> {
    let mut client = LoopbackClient::new(id);
    client.ping()?;
    Ok(client)
}

pub struct PoolScenario {
    fan_out: FanOut,
    pool: Option<ResourcePool<LoopbackClient>>,
    checked_out: Vec<Pooled<LoopbackClient>>,
}

impl PoolScenario {
    pub fn new(workers: usize) -> Result<Self, HarnessError> {
        Ok(Self {
            fan_out: fan_out(workers)?,
            pool: None,
            checked_out: Vec::new(),
        })
    }
}

impl LifecycleHooks for PoolScenario {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.pool = Some(ResourcePool::with_factory(POOL_CAPACITY, connect)?);
        Ok(())
    }

    fn before(&mut self) -> anyhow::Result<()> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("pool not created"))?;
        self.checked_out = pool.checkout_many(self.fan_out.workers())?;
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        self.fan_out
            .run(&mut self.checked_out, |_, client| Ok(client.ping()?))?;
        Ok(())
    }

    fn after(&mut self) -> anyhow::Result<()> {
        self.checked_out.clear();
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.checked_out.clear();
        self.pool = None;
        Ok(())
    }
}

pub struct SingleScenario {
    fan_out: FanOut,
    clients: Vec<LoopbackClient>,
}

impl SingleScenario {
    pub fn new(workers: usize) -> Result<Self, HarnessError> {
        Ok(Self {
            fan_out: fan_out(workers)?,
            clients: Vec::new(),
        })
    }
}

impl LifecycleHooks for SingleScenario {
    fn setup(&mut self) -> anyhow::Result<()> {
        self.clients = (0..POOL_CAPACITY)
            .map(connect)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        let workers = self.fan_out.workers();
        let clients = self
            .clients
            .get_mut(..workers)
            .ok_or_else(|| anyhow::anyhow!("clients not connected"))?;
        self.fan_out.run(clients, |_, client| Ok(client.ping()?))?;
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.clients.clear();
        Ok(())
    }
}

pub fn pool_scenario(workers: usize) -> Result<ScenarioDescriptor, HarnessError> {
    Ok(ScenarioDescriptor::new(
        format!("Parallel/Pool/Threads:{workers}"),
        data_size(workers),
        PoolScenario::new(workers)?,
    ))
}

pub fn single_scenario(workers: usize) -> Result<ScenarioDescriptor, HarnessError> {
    Ok(ScenarioDescriptor::new(
        format!("Parallel/Single/Threads:{workers}"),
        data_size(workers),
        SingleScenario::new(workers)?,
    ))
}

/// Pool scenarios for every thread count, then single-client scenarios.
pub fn scenarios() -> Result<Vec<ScenarioDescriptor>, HarnessError> {
    let pooled = THREAD_COUNTS.into_iter().map(pool_scenario);
    let single = THREAD_COUNTS.into_iter().map(single_scenario);
    pooled.chain(single).collect()
}
