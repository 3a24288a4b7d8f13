//! STP Simulator CLI
//!
//! Simulates root selection on a topology file and prints every node's next
//! hop towards the elected root.
//!
//! # Example
//!
//! ```bash
//! # Simulate input.txt in the working directory
//! stp-sim
//!
//! # Four phase threads, costs in the report, shortest-path check at the end
//! stp-sim graphs/office.txt --threads 4 --show-costs --verify
//!
//! # Print a random 20-node topology
//! stp-sim --generate 20 --extra-links 10 --seed 42 > random.txt
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stp_simulator::{OutputFormat, Simulator, SimulatorConfig};
use stp_topology::{generate_topology, load_topology, render_topology, GeneratorConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// STP Simulator
///
/// Runs synchronous rounds of root advertisements until no node changes its
/// route. Results are identical whatever the thread count.
#[derive(Parser, Debug)]
#[command(name = "stp-sim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Topology file (overrides config; default input.txt)
    input: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Phase threads; 0 runs phases inline (overrides config)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Round bound per run (overrides config; default node count + 1)
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Append believed root and cost to every report line
    #[arg(long)]
    show_costs: bool,

    /// Check converged routes against shortest paths
    #[arg(long)]
    verify: bool,

    /// Report format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print a random connected topology with this many nodes and exit
    #[arg(long)]
    generate: Option<usize>,

    /// Links added on top of the generated spanning tree
    #[arg(long, default_value = "0")]
    extra_links: usize,

    /// Seed for --generate. When omitted, a random seed is used.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level filter (overrides RUST_LOG)
    #[arg(long, default_value = "warn,stp_simulator=info")]
    log_level: String,
}

/// Apply CLI overrides to the configuration.
fn apply_overrides(config: &mut SimulatorConfig, cli: &Cli) {
    if let Some(ref input) = cli.input {
        config.input = input.clone();
    }

    if let Some(threads) = cli.threads {
        config.dispatch.threads = threads;
    }

    if let Some(max_rounds) = cli.max_rounds {
        config.simulation.max_rounds = Some(max_rounds);
    }

    if cli.show_costs {
        config.report.show_costs = true;
    }

    if cli.verify {
        config.report.verify = true;
    }

    if let Some(format) = cli.format {
        config.report.format = format;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    if let Some(nodes) = cli.generate {
        let seed = cli.seed.unwrap_or_else(rand::random);
        info!(nodes, extra_links = cli.extra_links, seed, "Generating topology");
        let topology = generate_topology(
            &GeneratorConfig::new(nodes, seed).with_extra_links(cli.extra_links),
        );
        print!("{}", render_topology(&topology));
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    let topology = load_topology(&config.input)?;
    if topology.is_empty() {
        warn!(input = %config.input.display(), "Topology has no nodes");
    }

    let simulator = Simulator::new(config.clone());
    let output = simulator
        .run(&topology)
        .context("Failed to start phase thread pool")?;

    print!(
        "{}",
        output
            .render(&config.report)
            .context("Failed to render report")?
    );

    if config.report.verify {
        output.analyze(&topology).print_summary();
    }

    if !output.outcome.is_converged() {
        warn!(
            rounds = output.outcome.rounds(),
            "Routes above are from an unconverged run"
        );
    }

    Ok(())
}
