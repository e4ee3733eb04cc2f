//! Command-line entry point for the ring black-hole search simulator.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ringscout_simulation::SimulationRunner;
use ringscout_simulator::{run_sweep, SimulatorConfig, SweepConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ringscout-sim")]
#[command(about = "Simulate two agents searching a ring for a black hole", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scenario and print its report
    Run(RunArgs),

    /// Run every hole position over a range of ring sizes and seeds
    Sweep(SweepArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Number of nodes in the ring
    #[arg(short = 'n', long, default_value_t = 5)]
    size: u32,

    /// Black hole position (omit for a ring without one)
    #[arg(short = 'b', long)]
    hole: Option<u32>,

    /// Node both agents start on
    #[arg(long, default_value_t = 0)]
    home: u32,

    /// Random seed
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Base hop latency in milliseconds
    #[arg(long, default_value_t = 10)]
    latency_ms: u64,

    /// Maximum extra hop latency in milliseconds
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,

    /// Give up after this many events
    #[arg(long, default_value_t = 1_000_000)]
    max_events: u64,

    /// Print every processed event
    #[arg(long)]
    trace: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SweepArgs {
    /// TOML file with a sweep configuration (flags below are ignored)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Smallest ring size
    #[arg(long, default_value_t = 3)]
    min_size: u32,

    /// Largest ring size
    #[arg(long, default_value_t = 32)]
    max_size: u32,

    /// Seeds per scenario
    #[arg(long, default_value_t = 4)]
    seeds: u64,

    /// Base hop latency in milliseconds
    #[arg(long, default_value_t = 10)]
    latency_ms: u64,

    /// Maximum extra hop latency in milliseconds
    #[arg(long, default_value_t = 5)]
    jitter_ms: u64,

    /// Skip rings without a black hole
    #[arg(long)]
    no_clear_ring: bool,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Sweep(args) => sweep(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let config = SimulatorConfig::new(args.size)
        .with_home(args.home)
        .with_black_hole(args.hole)
        .with_latency(args.latency_ms, args.jitter_ms)
        .with_seed(args.seed)
        .with_max_events(args.max_events);

    let mut runner = SimulationRunner::new(config.to_simulation_config().with_trace(args.trace))
        .context("invalid scenario")?;
    let report = runner.run()?;

    if args.json {
        #[derive(Serialize)]
        struct Output<'a> {
            report: &'a ringscout_simulation::SimulationReport,
            trace: &'a [ringscout_simulation::TraceEntry],
            verified: Option<String>,
        }
        let output = Output {
            report: &report,
            trace: runner.trace(),
            verified: report.verify().err().map(|e| e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for entry in runner.trace() {
            println!("{}", entry);
        }
        println!(
            "ring of {} nodes, home {}, black hole {:?}, seed {}",
            report.ring_size,
            report.home,
            report.black_hole.map(|n| n.0),
            report.seed
        );
        for agent in &report.agents {
            match (agent.destroyed_at, agent.outcome) {
                (Some(node), _) => println!("  {}: destroyed entering {}", agent.id, node),
                (None, Some(outcome)) => println!(
                    "  {}: {} after {} moves (round {})",
                    agent.id, outcome, agent.moves, agent.round
                ),
                (None, None) => println!("  {}: {} ({})", agent.id, agent.state, agent.phase),
            }
        }
        let states: Vec<String> = report.node_states.iter().map(|s| s.to_string()).collect();
        println!("  nodes: [{}]", states.join(", "));
        println!(
            "  {} events, finished at {:?}",
            report.events_processed, report.final_time
        );
    }

    if let Err(e) = report.verify() {
        bail!("run failed verification: {}", e);
    }
    Ok(())
}

fn sweep(args: SweepArgs) -> Result<()> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let config = match &args.config {
        Some(path) => SweepConfig::load(path)?,
        None => {
            let config = SweepConfig::default()
                .with_sizes(args.min_size, args.max_size)
                .with_seeds(args.seeds)
                .with_latency(args.latency_ms, args.jitter_ms)
                .with_clear_rings(!args.no_clear_ring);
            config.validate()?;
            config
        }
    };

    let summary = run_sweep(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }

    if !summary.is_success() {
        bail!("{} of {} scenarios failed", summary.failed, summary.runs);
    }
    Ok(())
}
