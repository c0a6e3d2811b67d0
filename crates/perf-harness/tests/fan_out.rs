//! Integration tests for fan-out/join over a bounded pool inside a scenario
//!
//! Run with: cargo test -p perf-harness --test fan_out

#[path = "common/scripted.rs"]
mod scripted;

use perf_harness::{
    BenchmarkRunner, FanOut, HarnessError, LifecycleHooks, Pooled, ResourcePool,
    ScenarioDescriptor, Suite,
};
use pretty_assertions::assert_eq;
use scripted::fast_config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CAPACITY: usize = 100;
const OPS: usize = 1_000;

/// Counts operations per handle and checks every worker joined in `task`.
struct Counting {
    pool: ResourcePool<u64>,
    fan_out: FanOut,
    checked_out: Vec<Pooled<u64>>,
    joined: Arc<AtomicUsize>,
}

impl Counting {
    fn new(workers: usize, pool: ResourcePool<u64>, joined: Arc<AtomicUsize>) -> Result<Self, HarnessError> {
        let fan_out = FanOut::new(workers, OPS, pool.capacity())?;
        Ok(Self {
            pool,
            fan_out,
            checked_out: Vec::new(),
            joined,
        })
    }
}

impl LifecycleHooks for Counting {
    fn before(&mut self) -> anyhow::Result<()> {
        self.checked_out = self.pool.checkout_many(self.fan_out.workers())?;
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        let joined = &self.joined;
        joined.store(0, Ordering::SeqCst);
        self.fan_out.run(&mut self.checked_out, |_, handle| {
            **handle += 1;
            Ok(())
        })?;
        joined.fetch_add(self.fan_out.workers(), Ordering::SeqCst);
        anyhow::ensure!(
            self.checked_out.iter().all(|h| **h % OPS as u64 == 0),
            "task returned before every worker finished"
        );
        Ok(())
    }

    fn after(&mut self) -> anyhow::Result<()> {
        self.checked_out.clear();
        Ok(())
    }
}

#[test]
fn test_ten_workers_join_inside_task() {
    let pool = ResourcePool::new(vec![0u64; CAPACITY]);
    let joined = Arc::new(AtomicUsize::new(0));
    let hooks = Counting::new(10, pool.clone(), Arc::clone(&joined)).unwrap();

    let suite: Suite = vec![ScenarioDescriptor::new("Parallel/Pool/Threads:10", 15 * 10 * OPS as u64, hooks)]
        .into_iter()
        .collect();

    let results = BenchmarkRunner::new(&fast_config(&[]))
        .with_progress(false)
        .run(suite)
        .unwrap();

    assert_eq!(results.scenario_results.len(), 1);
    assert_eq!(joined.load(Ordering::SeqCst), 10);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.idle(), CAPACITY);
}

#[test]
fn test_worker_count_above_capacity_fails_before_start() {
    let pool = ResourcePool::new(vec![0u64; CAPACITY]);
    let joined = Arc::new(AtomicUsize::new(0));

    let err = Counting::new(101, pool.clone(), joined).err().unwrap();
    assert!(matches!(
        err,
        HarnessError::WorkerCountExceedsCapacity { workers: 101, capacity: 100 }
    ));
    assert_eq!(pool.idle(), CAPACITY);
}

#[test]
fn test_pool_shared_across_scenarios() {
    let pool = ResourcePool::new(vec![0u64; CAPACITY]);
    let suite: Suite = [1, 10, 100]
        .into_iter()
        .map(|workers| {
            let hooks = Counting::new(workers, pool.clone(), Arc::new(AtomicUsize::new(0))).unwrap();
            ScenarioDescriptor::new(format!("Parallel/Pool/Threads:{workers}"), 15 * OPS as u64, hooks)
        })
        .collect();

    let results = BenchmarkRunner::new(&fast_config(&[]))
        .with_progress(false)
        .run(suite)
        .unwrap();

    assert_eq!(results.scenario_results.len(), 3);
    assert_eq!(pool.idle(), CAPACITY);
}
