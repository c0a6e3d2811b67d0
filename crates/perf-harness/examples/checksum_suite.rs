//! Run a small in-memory suite from a TOML config file
//!
//! Usage: cargo run -p perf-harness --example checksum_suite -- [config.toml]

use anyhow::Result;
use perf_harness::config::HarnessConfig;
use perf_harness::reporter::{OutputFormat, Reporter};
use perf_harness::runner::BenchmarkRunner;
use perf_harness::{LifecycleHooks, ScenarioDescriptor, Suite};
use std::env;
use std::hint::black_box;

const BUFFER_LEN: usize = 1 << 20;

/// Sums a buffer; the buffer is refilled untimed before every iteration.
struct Checksum {
    buffer: Vec<u8>,
    seed: u8,
}

impl LifecycleHooks for Checksum {
    fn setup(&mut self) -> Result<()> {
        self.buffer = vec![0; BUFFER_LEN];
        Ok(())
    }

    fn before(&mut self) -> Result<()> {
        self.seed = self.seed.wrapping_add(1);
        self.buffer.fill(self.seed);
        Ok(())
    }

    fn task(&mut self) -> Result<()> {
        black_box(self.buffer.iter().map(|b| u64::from(*b)).sum::<u64>());
        Ok(())
    }
}

/// Counts to a fixed bound; no natural data size, so reported as iterations/s.
struct Spin;

impl LifecycleHooks for Spin {
    fn task(&mut self) -> Result<()> {
        black_box((0..100_000u64).fold(0, |acc, n| acc ^ n));
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            println!("Loading config from: {}", path);
            HarnessConfig::from_file(path)?
        }
        None => HarnessConfig {
            sampling: HarnessConfig::default().sampling.quick(),
            ..HarnessConfig::default()
        },
    };

    println!("Starting suite: {}", config.suite.name);
    println!("  Min time: {}ms", config.sampling.min_time.as_millis());
    println!("  Max time: {}ms", config.sampling.max_time.as_millis());
    println!("  Max iterations: {}", config.sampling.max_iterations);
    println!();

    let mut suite = Suite::new();
    suite.push(ScenarioDescriptor::new(
        "Checksum1MiB",
        BUFFER_LEN as u64,
        Checksum { buffer: Vec::new(), seed: 0 },
    ));
    suite.push(ScenarioDescriptor::new("Spin", 0, Spin));

    let results = BenchmarkRunner::new(&config).run(suite)?;

    Reporter::new(OutputFormat::Console).report(&results)?;
    Reporter::new(OutputFormat::Json).report(&results)?;
    println!();

    Ok(())
}
