//! Aid Estimator CLI
//!
//! Runs a full recalculation for one applicant session and prints the
//! estimate. Inputs come from a saved session, a state file, and `--set`
//! assignments, applied in that order.

use aid_estimator::cost_source::DEFAULT_COSTS_PATH;
use aid_estimator::form::{
    capture_inputs, kind_of, FieldKind, JsonFileStore, MemoryResolver, StateStore, DEFAULT_SESSION_KEY,
};
use aid_estimator::{
    AidEngine, CostSource, CostTable, EstimateSummary, FoldOutcome, FormState, HttpCostSource, Orchestrator,
    RateTables,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Net price and financial aid estimate for one applicant
#[derive(Parser, Debug)]
#[command(name = "aid_estimator")]
#[command(about = "Net price and financial aid estimate for one applicant", long_about = None)]
struct Cli {
    /// Directory holding saved sessions; the session is loaded and saved back
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// Session id within the session directory
    #[arg(long, default_value = DEFAULT_SESSION_KEY)]
    session: String,

    /// JSON file with a form state to start from
    #[arg(long)]
    state: Option<PathBuf>,

    /// Input field assignment, e.g. --set gpa=3.8 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Cost of attendance CSV
    #[arg(long, conflicts_with = "cost_url")]
    costs: Option<PathBuf>,

    /// Cost of attendance query service URL
    #[arg(long)]
    cost_url: Option<String>,

    /// Directory of rate table overlays
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Print the full state and summary as JSON
    #[arg(long)]
    json: bool,

    /// Do not save the session back
    #[arg(long)]
    dry_run: bool,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{}`", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field key in `{}`", arg));
    }
    Ok((key.to_string(), value.to_string()))
}

fn cost_source(cli: &Cli) -> Result<CostSource> {
    if let Some(url) = &cli.cost_url {
        let http = HttpCostSource::new(url.clone()).context("failed to build cost lookup client")?;
        return Ok(http.into());
    }
    let path = cli.costs.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_COSTS_PATH));
    let table = CostTable::from_csv_path(&path)
        .with_context(|| format!("failed to load cost table {}", path.display()))?;
    Ok(table.into())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tables = match &cli.tables {
        Some(dir) => Arc::new(
            RateTables::from_csv_path(dir)
                .with_context(|| format!("failed to load rate tables from {}", dir.display()))?,
        ),
        None => RateTables::shared(),
    };
    let engine = AidEngine::new(tables)?;
    let orchestrator = Orchestrator::new(engine, Arc::new(cost_source(&cli)?));

    let mut store = cli
        .session_dir
        .as_ref()
        .map(|dir| JsonFileStore::new(dir, cli.session.as_str()));

    let mut state = match &store {
        Some(store) => store.load()?,
        None => FormState::new(),
    };
    if let Some(path) = &cli.state {
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let from_file: FormState = serde_json::from_str(&contents)
            .with_context(|| format!("{} is not a form state document", path.display()))?;
        for (key, value) in from_file.iter() {
            state.set(key, value.clone());
        }
    }

    let mut resolver = MemoryResolver::new();
    for (key, value) in &cli.assignments {
        match kind_of(key) {
            Some(FieldKind::Input) => resolver.enter(key, value.as_str()),
            Some(FieldKind::Calculated) => bail!("`{}` is calculated and cannot be set", key),
            None => bail!("unknown field `{}`", key),
        }
    }
    let captured = capture_inputs(&resolver, &mut state);
    log::debug!("captured {} input(s) from the command line", captured);

    if orchestrator.recalculate_all(&mut state).await == FoldOutcome::Stale {
        log::warn!("cost lookup was superseded; estimate shown without it");
    }
    let summary = EstimateSummary::from_state(&state);

    if let Some(store) = store.as_mut() {
        if cli.dry_run {
            log::info!("dry run: session {} not saved", cli.session);
        } else {
            store.save(&state)?;
            log::info!("saved session to {}", store.path().display());
        }
    }

    if cli.json {
        let output = serde_json::json!({ "state": state, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Aid Estimator v{}", env!("CARGO_PKG_VERSION"));
        println!("======================\n");
        println!("{}", summary.report());
    }

    Ok(())
}
