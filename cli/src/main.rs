//! Capacity Simulator CLI
//!
//! Run one simulated day from a JSON config and emit the report as JSON.

use anyhow::{Context, Result};
use capacity_simulator_core_rs::{Orchestrator, SimulationConfig, SimulationOutput};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "capacity-sim")]
#[command(about = "Simulate fixed capacity against a day of prioritised demand", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Override the configured capacity (units per minute)
    #[arg(long)]
    capacity: Option<f64>,

    /// Override the queue timeout (minutes)
    #[arg(short, long)]
    timeout: Option<usize>,

    /// Override the output trace sampling interval (minutes)
    #[arg(long)]
    sample_interval: Option<usize>,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Print a per-source summary table to stderr
    #[arg(long)]
    summary: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of the file config
    fn apply_overrides(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(timeout) = self.timeout {
            config.queue_timeout = timeout;
        }
        if let Some(sample_interval) = self.sample_interval {
            config.sample_interval = sample_interval;
        }
        config
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let json = fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config {}", args.config.display()))?;
    let config = SimulationConfig::from_json(&json)
        .with_context(|| format!("invalid config {}", args.config.display()))?;
    Ok(args.apply_overrides(config))
}

fn format_summary(output: &SimulationOutput) -> String {
    let mut lines = vec![format!(
        "{:<16} {:>4} {:>14} {:>14} {:>14} {:>8}",
        "source", "prio", "volume", "served", "shed", "shed %"
    )];

    for (id, source) in &output.per_source {
        lines.push(format!(
            "{:<16} {:>4} {:>14.1} {:>14.1} {:>14.1} {:>8.2}",
            id,
            source.priority,
            source.total_volume,
            source.total_served,
            source.total_shed,
            source.shed_percent
        ));
    }

    let aggregate = &output.metrics;
    lines.push(format!(
        "{:<16} {:>4} {:>14.1} {:>14.1} {:>14.1} {:>8.2}",
        "total",
        "",
        aggregate.total_volume,
        aggregate.total_served,
        aggregate.total_shed,
        aggregate.shed_percent
    ));
    lines.push(format!(
        "peak utilization {:.2}% | average utilization {:.2}% | end-of-horizon shed {:.1}",
        aggregate.peak_percent, aggregate.average_percent, output.end_of_horizon_shed
    ));

    lines.join("\n")
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so the JSON report on stdout stays parseable
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    debug!(?config, "loaded configuration");

    let orchestrator = Orchestrator::new(config).context("failed to initialise simulation")?;
    info!(config_hash = orchestrator.config_hash(), "starting run");
    let output = orchestrator.finish().context("simulation failed")?;

    let json = output
        .to_json(args.pretty)
        .context("failed to serialize report")?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", json),
    }

    if args.summary {
        eprintln!("{}", format_summary(&output));
    }

    Ok(())
}
