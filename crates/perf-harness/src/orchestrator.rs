//! Fan-out/join of worker threads inside a single `task()` call
//!
//! A [`FanOut`] is validated against the pool it draws handles from when it
//! is built, so a worker count above the pool's capacity is rejected before
//! any scenario runs. [`FanOut::run`] starts one scoped thread per handle,
//! gives each thread exclusive `&mut` access to its handle, and returns only
//! after every thread has been joined.
//!
//! # Example
//!
//! ```
//! use perf_harness::orchestrator::FanOut;
//! use perf_harness::pool::ResourcePool;
//!
//! # fn example() -> anyhow::Result<()> {
//! let pool = ResourcePool::new(vec![0u64; 100]);
//! let fan_out = FanOut::new(10, 1_000, pool.capacity())?;
//!
//! let mut handles = pool.checkout_many(fan_out.workers())?;
//! fan_out.run(&mut handles, |_worker, counter| {
//!     **counter += 1;
//!     Ok(())
//! })?;
//!
//! assert!(handles.iter().all(|c| **c == 1_000));
//! # Ok(())
//! # }
//! ```

use std::thread;
use tracing::{debug, warn};

use crate::error::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOut {
    workers: usize,
    repetitions: usize,
}

impl FanOut {
    /// `workers` threads, each running its unit of work `repetitions` times.
    ///
    /// Fails when `workers` is zero or exceeds `capacity`, the size of the
    /// pool the handles will come from.
    pub fn new(workers: usize, repetitions: usize, capacity: usize) -> Result<Self, HarnessError> {
        if workers == 0 {
            return Err(HarnessError::Config("worker count must be at least 1".to_string()));
        }
        if workers > capacity {
            return Err(HarnessError::WorkerCountExceedsCapacity { workers, capacity });
        }
        Ok(Self {
            workers,
            repetitions,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Run all workers to completion.
    ///
    /// `work` is called with the worker index and that worker's handle.
    /// Every worker is joined before this returns; the error of the
    /// lowest-numbered failing worker is returned.
    pub fn run<H, F>(&self, handles: &mut [H], work: F) -> Result<(), HarnessError>
    where
        H: Send,
        F: Fn(usize, &mut H) -> anyhow::Result<()> + Sync,
    {
        if handles.len() != self.workers {
            return Err(HarnessError::Config(format!(
                "fan-out expects {} handles, got {}",
                self.workers,
                handles.len()
            )));
        }

        let repetitions = self.repetitions;
        let work = &work;

        let outcomes: Vec<Result<(), HarnessError>> = thread::scope(|scope| {
            let spawned: Vec<_> = handles
                .iter_mut()
                .enumerate()
                .map(|(worker, handle)| {
                    let joined = thread::Builder::new()
                        .name(format!("perf-worker-{worker}"))
                        .spawn_scoped(scope, move || {
                            (0..repetitions).try_for_each(|_| work(worker, handle))
                        });
                    (worker, joined)
                })
                .collect();

            spawned
                .into_iter()
                .map(|(worker, joined)| match joined {
                    Err(source) => Err(HarnessError::Worker {
                        worker,
                        source: anyhow::Error::new(source).context("failed to spawn worker thread"),
                    }),
                    Ok(handle) => match handle.join() {
                        Ok(Ok(())) => Ok(()),
                        Ok(Err(source)) => Err(HarnessError::Worker { worker, source }),
                        Err(_) => Err(HarnessError::WorkerPanicked { worker }),
                    },
                })
                .collect()
        });

        debug!(workers = self.workers, repetitions, "fan-out joined");

        match outcomes.into_iter().find_map(Result::err) {
            Some(err) => {
                warn!(workers = self.workers, "fan-out failed: {}", err);
                Err(err)
            }
            None => Ok(()),
        }
    }
}
