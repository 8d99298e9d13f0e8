//! Score every applicant in a CSV export
//!
//! Outputs one estimate summary row per applicant

use aid_estimator::cost_source::DEFAULT_COSTS_PATH;
use aid_estimator::form::loader::DEFAULT_APPLICANTS_PATH;
use aid_estimator::form::load_applicants;
use aid_estimator::{AidEngine, CostTable, EstimateRunner, RateTables};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Batch net price estimates
#[derive(Parser, Debug)]
#[command(name = "run_batch")]
#[command(about = "Score every applicant in a CSV export", long_about = None)]
struct Args {
    /// Applicants CSV; the header row holds field keys
    #[arg(default_value = DEFAULT_APPLICANTS_PATH)]
    applicants: PathBuf,

    /// Cost of attendance CSV
    #[arg(long, default_value = DEFAULT_COSTS_PATH)]
    costs: PathBuf,

    /// Directory of rate table overlays
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Summary CSV to write
    #[arg(long, short, default_value = "estimates_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading applicants from {}...", args.applicants.display());
    let applicants = load_applicants(&args.applicants)
        .with_context(|| format!("failed to load applicants from {}", args.applicants.display()))?;
    println!("Loaded {} applicants in {:?}", applicants.len(), start.elapsed());

    let tables = match &args.tables {
        Some(dir) => Arc::new(
            RateTables::from_csv_path(dir)
                .with_context(|| format!("failed to load rate tables from {}", dir.display()))?,
        ),
        None => RateTables::shared(),
    };
    let costs = CostTable::from_csv_path(&args.costs)
        .with_context(|| format!("failed to load cost table {}", args.costs.display()))?;
    let runner = EstimateRunner::new(AidEngine::new(tables)?, costs);

    println!("Running estimates...");
    let run_start = Instant::now();
    let summaries = runner.summarize(applicants);
    println!("Scored {} applicants in {:?}", summaries.len(), run_start.elapsed());

    let missing_costs = summaries.iter().filter(|s| s.total_cost.is_empty()).count();
    if missing_costs > 0 {
        log::warn!("{} applicant(s) had no cost of attendance row", missing_costs);
    }

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for summary in &summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    println!("Results written to: {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
