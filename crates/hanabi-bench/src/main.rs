use std::path::PathBuf;

use clap::Parser;

use hanabi_bench::config::{BenchmarkConfig, InputConfig, ResolvedOutputs};
use hanabi_bench::logging::init_logging;
use hanabi_bench::runner::DecisionRunner;
use hanabi_bot::Chromosome;

/// Offline decision harness for the chromosome-driven Hanabi agent.
#[derive(Debug, Parser)]
#[command(
    name = "hanabi-bench",
    author,
    version,
    about = "Replay observations through a rule-cascade Hanabi agent"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the chromosome, e.g. "5,1,10,15".
    #[arg(long, value_name = "CODES")]
    chromosome: Option<Chromosome>,

    /// Override the recorded observations file (JSONL).
    #[arg(long, value_name = "FILE")]
    observations: Option<PathBuf>,

    /// Override the number of synthetic opening deals.
    #[arg(long, value_name = "COUNT")]
    deals: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no decisions are made).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(chromosome) = cli.chromosome {
        config.agent.chromosome = chromosome;
    }

    if let Some(observations) = cli.observations {
        config.input = Some(InputConfig { observations });
    }

    config.override_deals(cli.deals, cli.seed)?;
    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();

    println!(
        "Loaded configuration '{run_id}' with chromosome [{}] (cap {} information tokens)",
        config.agent.chromosome, config.agent.information_tokens
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = DecisionRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no decisions made.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} observations → {} decisions ({} hints, {} not to move) at {}",
        summary.observations,
        summary.decisions,
        summary.hints,
        summary.idle,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for (rule, count) in &summary.rule_counts {
        println!("  {rule}: {count}");
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
