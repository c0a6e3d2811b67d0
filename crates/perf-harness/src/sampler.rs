//! Adaptive stopping rule and the duration sample buffer
//!
//! The sampler is consulted before every iteration:
//!
//! 1. While less than `min_time` has accumulated, keep going, even past
//!    `max_iterations`.
//! 2. Otherwise keep going only while fewer than `max_iterations` have run
//!    and less than `max_time` has accumulated.
//!
//! Accumulated time is the sum of the timed task phases only. The first
//! iteration always runs, so a finished sampler holds at least one sample.

use std::time::Duration;

use crate::config::SamplingConfig;

/// Upper bound on the up-front sample reservation; the buffer grows past it.
const INITIAL_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct AdaptiveSampler {
    min_time: Duration,
    max_time: Duration,
    max_iterations: usize,
    accumulated: Duration,
    samples: Vec<Duration>,
}

impl AdaptiveSampler {
    pub fn new(config: &SamplingConfig) -> Self {
        Self {
            min_time: config.min_time,
            max_time: config.max_time,
            max_iterations: config.max_iterations,
            accumulated: Duration::ZERO,
            samples: Vec::with_capacity(config.max_iterations.min(INITIAL_CAPACITY)),
        }
    }

    /// Whether another iteration should start.
    pub fn should_continue(&self) -> bool {
        if self.samples.is_empty() {
            return true;
        }
        if self.accumulated < self.min_time {
            return true;
        }
        self.samples.len() < self.max_iterations && self.accumulated < self.max_time
    }

    /// Record the timed duration of one completed iteration.
    pub fn record(&mut self, elapsed: Duration) {
        self.accumulated += elapsed;
        self.samples.push(elapsed);
    }

    pub fn iterations(&self) -> usize {
        self.samples.len()
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// Hand the buffer over once sampling is finished.
    pub fn into_samples(self) -> Vec<Duration> {
        self.samples
    }
}
