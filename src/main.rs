//! River Commons - Entry Point
//!
//! Runs one scenario under a chosen quota and incentive policy and prints
//! the batch summary or a JSON report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use river_commons::core::{Result, ScenarioConfig, SimError};
use river_commons::policy::{incentive_policy_by_name, quota_policy_by_name};
use river_commons::simulation::{FinalScores, Series, Simulation};

/// River Commons - water allocation game on a shared river
#[derive(Parser, Debug)]
#[command(name = "river-commons")]
#[command(about = "Run a water allocation scenario and report scaled scores")]
struct Args {
    /// Scenario TOML file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quota policy: hard_quota or no_quota
    #[arg(long, default_value = "hard_quota")]
    quota: String,

    /// Incentive policy: no_incentive, fine, subsidy or mixed
    #[arg(long, default_value = "no_incentive")]
    incentive: String,

    /// Base seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of iterations (overrides the config)
    #[arg(long)]
    iterations: Option<u32>,

    /// Turns per iteration (overrides the config)
    #[arg(long)]
    turns: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include the time series of iteration 0 in JSON output
    #[arg(long)]
    series: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON output structure
#[derive(Serialize)]
struct RunOutput {
    quota_policy: String,
    incentive_policy: String,
    seed: u64,
    completed: usize,
    failed_iterations: Vec<u32>,
    final_scores: Option<FinalScores>,
    final_scores_scaled: Option<FinalScores>,
    iteration_scores_scaled: Vec<(u32, FinalScores)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<Series>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(iterations) = args.iterations {
        config.nb_iterations = iterations;
    }
    if let Some(turns) = args.turns {
        config.total_turns = turns;
    }

    let quota = quota_policy_by_name(&args.quota)?;
    let incentive = incentive_policy_by_name(&args.incentive)?;
    let seed = config.seed;

    let mut sim = Simulation::new(config, quota, incentive)?;
    let report = sim.run();

    if args.format == OutputFormat::Json {
        let output = RunOutput {
            quota_policy: args.quota.clone(),
            incentive_policy: args.incentive.clone(),
            seed,
            completed: report.completed.len(),
            failed_iterations: report.failed_indices(),
            final_scores: report.final_scores(),
            final_scores_scaled: report.final_scores_scaled(),
            iteration_scores_scaled: report.iteration_scores_scaled(),
            series: if args.series {
                report.iteration(0).map(|r| r.series())
            } else {
                None
            },
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| SimError::Serialization(e.to_string()))?;
        println!("{}", json);
    } else {
        println!("River Commons: quota '{}', incentive '{}', seed {}", args.quota, args.incentive, seed);
        println!("{}", report.summary());
        if let Some(raw) = report.final_scores() {
            println!(
                "raw ecological impact {:.2}, raw economic impact {:.2}",
                raw.ecological_impact, raw.economic_impact
            );
        }
    }

    Ok(())
}
