use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use binpack_optimizer::generator::WorkloadGenerator;
use binpack_optimizer::report::RunReport;
use binpack_optimizer::scheduler::verify_solution;
use binpack_optimizer::{solve_ffd, Config, ConsolidationOptimizer};

#[derive(Parser)]
#[command(name = "binpack-optimizer")]
#[command(about = "Multidimensional workload placement and server consolidation")]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override optimizer.max_iterations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Override both the generator and optimizer seeds
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override generator.workload_count
    #[arg(short, long)]
    workloads: Option<usize>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml().context("failed to render configuration")?);
        return Ok(());
    }

    let template = config.template.server_template();
    let workloads = WorkloadGenerator::new(config.generator.clone())?.generate();
    info!(
        workloads = workloads.len(),
        capacity = %template.capacity,
        "generated simulation input"
    );

    let initial = solve_ffd(&workloads, &template).context("initial placement failed")?;
    verify_solution(&initial, &workloads).context("initial placement is inconsistent")?;

    let rng = StdRng::seed_from_u64(config.optimizer.seed);
    let outcome = ConsolidationOptimizer::new(config.optimizer.clone(), rng).optimize(initial.clone());
    verify_solution(&outcome.nodes, &workloads).context("optimized placement is inconsistent")?;

    if outcome.report.nodes_saved == 0 {
        warn!("local search did not remove any server");
    }

    let report = RunReport::new(&workloads, &template, &initial, &outcome.nodes, &outcome.report);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading {}", path))?,
        None => Config::default(),
    };

    if let Some(iterations) = cli.iterations {
        config.optimizer.max_iterations = iterations;
    }
    if let Some(seed) = cli.seed {
        config.generator.seed = seed;
        config.optimizer.seed = seed;
    }
    if let Some(count) = cli.workloads {
        config.generator.workload_count = count;
    }

    config.validate()?;
    Ok(config)
}
