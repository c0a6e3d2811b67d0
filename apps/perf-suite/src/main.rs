//! perf-suite binary
//!
//! Runs the built-in scenario catalogue and writes the report document.

use anyhow::Context;
use clap::Parser;
use perf_harness::{BenchmarkRunner, FixtureDir, HarnessConfig, OutputFormat, Reporter};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "perf-suite")]
#[command(version, about = "Microbenchmark suite with adaptive sampling")]
struct Args {
    /// Run each scenario for about five seconds instead of one to five minutes
    #[arg(long)]
    quick: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report destination (overrides the configuration file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run every selected scenario's hooks once, without timing or a report
    #[arg(long)]
    utility: bool,

    /// Format of the report file: json, json-pretty, console or markdown
    #[arg(long, default_value = "json-pretty")]
    format: OutputFormat,

    /// Directory holding the fixture files
    fixture_dir: PathBuf,

    /// Scenario names to run; none runs every scenario
    tests: Vec<String>,
}

fn main() {
    let args = Args::parse();

    // Progress lines and the summary go to stdout; logs stay on stderr.
    tracing_subscriber::registry()
        .with(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(args) {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    tracing::info!("Starting perf-suite v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Fixtures: {}", config.suite.fixture_dir.display());

    let fixtures = FixtureDir::new(&config.suite.fixture_dir);
    let suite = perf_suite::build_suite(&fixtures).context("Failed to build scenario catalogue")?;
    let runner = BenchmarkRunner::new(&config);

    if args.utility {
        let count = runner.run_as_utility(suite)?;
        tracing::info!("Ran {} scenarios once", count);
        return Ok(());
    }

    let results = runner.run(suite)?;
    Reporter::new(args.format).write_to_file(&results, &config.suite.output)?;
    Reporter::new(OutputFormat::Console).report(&results)?;
    Ok(())
}

/// Layer command-line flags over the configuration file, if any.
fn build_config(args: &Args) -> anyhow::Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };

    if args.quick {
        config.sampling = config.sampling.quick();
    }
    if let Some(output) = &args.output {
        config.suite.output = output.clone();
    }
    config.suite.fixture_dir = args.fixture_dir.clone();
    if !args.tests.is_empty() {
        config.suite.tests = args.tests.clone();
    }

    config.validate()?;
    Ok(config)
}
