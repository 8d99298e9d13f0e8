//! Estimate runner for efficient batch estimates
//!
//! Pre-loads the rate tables and the cost table once, then scores any number
//! of applicants without touching the filesystem or the network again.

use crate::cost_source::CostTable;
use crate::engine::{AidEngine, CostOutcome, EstimateSummary};
use crate::error::PipelineError;
use crate::form::fields;
use crate::form::FormState;
use crate::tables::RateTables;
use rayon::prelude::*;

/// Pre-loaded runner for offline estimates
///
/// # Example
/// ```ignore
/// let runner = EstimateRunner::from_csv()?;
/// let applicants = load_default_applicants()?;
/// for state in runner.run_batch(applicants) {
///     println!("{}", EstimateSummary::from_state(&state).report());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EstimateRunner {
    engine: AidEngine,
    costs: CostTable,
}

impl EstimateRunner {
    pub fn new(engine: AidEngine, costs: CostTable) -> Self {
        Self { engine, costs }
    }

    /// Built-in rate tables and the cost table at its default location
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            engine: AidEngine::new(RateTables::shared())?,
            costs: CostTable::from_csv()?,
        })
    }

    /// Runner with the built-in tables over an in-memory cost table
    pub fn with_costs(costs: CostTable) -> Result<Self, PipelineError> {
        Ok(Self {
            engine: AidEngine::new(RateTables::shared())?,
            costs,
        })
    }

    /// Score one applicant: cascade, cost lookup, then the cascade again
    pub fn run(&self, mut state: FormState) -> FormState {
        self.engine.recalculate(&mut state);
        let key = state.text(fields::COA_KEY);
        let outcome = match self.costs.get(&key) {
            Some(row) if !key.is_empty() => CostOutcome::Found(row.clone()),
            _ => CostOutcome::NotFound,
        };
        self.engine.fold_cost(&mut state, &outcome);
        state
    }

    /// Score many applicants in parallel, preserving input order
    pub fn run_batch(&self, applicants: Vec<FormState>) -> Vec<FormState> {
        applicants.into_par_iter().map(|state| self.run(state)).collect()
    }

    pub fn summarize(&self, applicants: Vec<FormState>) -> Vec<EstimateSummary> {
        self.run_batch(applicants)
            .iter()
            .map(EstimateSummary::from_state)
            .collect()
    }

    pub fn engine(&self) -> &AidEngine {
        &self.engine
    }

    pub fn costs(&self) -> &CostTable {
        &self.costs
    }
}
