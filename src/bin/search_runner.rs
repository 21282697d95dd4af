//! Headless Search Runner
//!
//! Runs a named preset's conditions in parallel and prints one report per
//! condition, as JSON or text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use visual_search::core::error::Result;
use visual_search::experiment::{preset, run_suite_parallel, ConditionReport, PRESET_NAMES};
use visual_search::ModelConfig;

/// Headless Search Runner - batch visual search simulations
#[derive(Parser, Debug)]
#[command(name = "search_runner")]
#[command(about = "Run preset visual search experiments and report RT by set size")]
struct Args {
    /// Preset name (see --list-presets)
    #[arg(long, default_value = "wolfe")]
    preset: String,

    /// TOML file overriding model parameters (see config/search.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Runs per set size (defaults to the preset's own count)
    #[arg(long)]
    runs: Option<u32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the available presets and exit
    #[arg(long)]
    list_presets: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SuiteOutput {
    preset: String,
    seed: u64,
    reports: Vec<ConditionReport>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visual_search=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_presets {
        for name in PRESET_NAMES {
            if let Ok(p) = preset(name) {
                println!("{:<28} {}", p.name, p.description);
            }
        }
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);

    let base = match &args.config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::default(),
    };

    let mut suite = preset(&args.preset)?;
    if let Some(runs) = args.runs {
        suite = suite.with_runs(runs);
    }
    let config = suite.configure(&base)?;

    tracing::info!(
        "Running preset '{}' ({} conditions, seed {})",
        suite.name,
        suite.conditions.len(),
        seed
    );
    let reports = run_suite_parallel(&config, &suite.conditions, seed)?;

    if args.format == "text" {
        println!("{} (seed {})", suite.description, seed);
        for report in &reports {
            println!("{}", report.summary());
        }
    } else {
        let output = SuiteOutput {
            preset: suite.name.to_string(),
            seed,
            reports,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
